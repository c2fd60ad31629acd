//! Simulation step loop and settle detection.
//!
//! The simulation is cooperative: the caller drives `step(dt)` and the loop
//! never blocks. Energy (alpha) rises on interaction and decays toward the
//! alpha target; once velocities stay below threshold for a sustained run of
//! steps, with no drag in flight and alpha itself decayed, the simulation is
//! settled and fully stops until the next `warmup()`.

use rand::Rng;

use crate::graph::QuestGraph;

use super::{forces, LayoutConfig};

/// Alpha below which the simulation is considered cool enough to settle.
const SETTLE_ALPHA: f32 = 0.02;
/// Max combined |vx| + |vy| allowed while counting down to settled.
const SETTLE_VELOCITY: f32 = 0.03;
/// Consecutive quiet steps required before stopping.
const SETTLE_STEPS: u32 = 24;
/// Time units a warmup keeps the alpha target raised before cooling.
const COOLDOWN_TIME: f32 = 20.0;
/// Per-unit-time approach rate of alpha toward its target.
const ALPHA_DECAY: f32 = 0.0228;

/// Physical state of one node: position, velocity, optional pin.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutBody {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Pinned x; locked roots and dragged nodes set this.
    pub fx: Option<f32>,
    /// Pinned y; only set while dragging.
    pub fy: Option<f32>,
}

/// Simulation lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// No energy and not yet settled (initial state).
    Cold,
    /// An interaction raised the alpha target; iteration is active.
    Warming,
    /// The alpha target dropped back to zero; energy is decaying.
    Cooling,
    /// Velocities stayed quiet long enough; the loop is stopped.
    Settled,
}

/// Force-directed layout simulation over a quest graph.
pub struct Simulation {
    bodies: Vec<LayoutBody>,
    depths: Vec<u32>,
    locked_roots: Vec<bool>,
    edges: Vec<(usize, usize)>,
    config: LayoutConfig,
    alpha: f32,
    alpha_target: f32,
    cooldown_remaining: f32,
    settle_count: u32,
    drag_count: u32,
    settled: bool,
}

impl Simulation {
    /// Seeds bodies from graph depths: each node starts near its depth
    /// column with a random vertical spread, and lockable roots get their
    /// horizontal position pinned to the margin.
    pub fn new(graph: &QuestGraph, config: LayoutConfig, rng: &mut impl Rng) -> Self {
        let mut bodies = Vec::with_capacity(graph.len());
        let mut depths = Vec::with_capacity(graph.len());
        let mut locked_roots = Vec::with_capacity(graph.len());
        let band = (config.height - 2.0 * config.margin).max(1.0);

        for (idx, node) in graph.nodes().iter().enumerate() {
            let locked = graph.is_lockable_root(idx);
            let jitter: f32 = rng.gen_range(-10.0..10.0);
            let x = config.margin + node.depth as f32 * config.column_gap + jitter;
            let y = config.margin + rng.gen_range(0.0..1.0) * band;
            bodies.push(LayoutBody {
                x,
                y,
                fx: locked.then_some(config.margin),
                ..Default::default()
            });
            depths.push(node.depth);
            locked_roots.push(locked);
        }

        Self {
            bodies,
            depths,
            locked_roots,
            edges: graph.edges().to_vec(),
            config,
            alpha: 0.0,
            alpha_target: 0.0,
            cooldown_remaining: 0.0,
            settle_count: 0,
            drag_count: 0,
            settled: false,
        }
    }

    pub fn bodies(&self) -> &[LayoutBody] {
        &self.bodies
    }

    pub fn body(&self, idx: usize) -> &LayoutBody {
        &self.bodies[idx]
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn phase(&self) -> SimPhase {
        if self.settled {
            SimPhase::Settled
        } else if self.alpha_target > 0.0 {
            SimPhase::Warming
        } else if self.alpha > SETTLE_ALPHA {
            SimPhase::Cooling
        } else {
            SimPhase::Cold
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Re-energizes the simulation after an interaction and re-arms the
    /// cool-down window.
    pub fn warmup(&mut self) {
        self.settled = false;
        self.settle_count = 0;
        self.alpha = self.alpha.max(0.45);
        self.alpha_target = 0.3;
        self.cooldown_remaining = COOLDOWN_TIME;
    }

    /// Begins dragging a node: pins it, keeps roots on the left margin, and
    /// re-warms the simulation.
    pub fn begin_drag(&mut self, idx: usize) {
        if idx >= self.bodies.len() {
            return;
        }
        self.drag_count += 1;
        if self.locked_roots[idx] {
            self.bodies[idx].fx = Some(self.config.margin);
            self.bodies[idx].fy = Some(self.bodies[idx].y);
        } else {
            self.bodies[idx].fx = Some(self.bodies[idx].x);
            self.bodies[idx].fy = Some(self.bodies[idx].y);
        }
        self.warmup();
    }

    /// Moves an in-flight drag.
    pub fn drag_to(&mut self, idx: usize, x: f32, y: f32) {
        if idx >= self.bodies.len() {
            return;
        }
        self.bodies[idx].fx = Some(x);
        self.bodies[idx].fy = Some(y);
    }

    /// Ends a drag: roots stay pinned to the margin with a free y, everything
    /// else is released on both axes.
    pub fn end_drag(&mut self, idx: usize) {
        if idx >= self.bodies.len() {
            return;
        }
        self.drag_count = self.drag_count.saturating_sub(1);
        if self.locked_roots[idx] {
            self.bodies[idx].fx = Some(self.config.margin);
            self.bodies[idx].fy = None;
        } else {
            self.bodies[idx].fx = None;
            self.bodies[idx].fy = None;
        }
        if self.drag_count == 0 {
            self.alpha_target = 0.0;
        }
    }

    /// Advances the simulation by `dt` time units.
    ///
    /// A settled simulation is a no-op until the next `warmup()`.
    pub fn step(&mut self, dt: f32) {
        if self.settled || self.bodies.is_empty() || dt <= 0.0 {
            return;
        }

        // Cool-down: after the window expires the alpha target drops and
        // energy decays freely toward zero.
        if self.alpha_target > 0.0 {
            self.cooldown_remaining -= dt;
            if self.cooldown_remaining <= 0.0 {
                self.alpha_target = 0.0;
            }
        }

        let blend = (ALPHA_DECAY * dt).min(1.0);
        self.alpha += (self.alpha_target - self.alpha) * blend;

        forces::apply_links(&mut self.bodies, &self.edges, self.alpha, &self.config);
        forces::apply_charge(&mut self.bodies, self.alpha, &self.config);
        forces::apply_collide(&mut self.bodies, &self.config);
        forces::apply_depth_anchor(
            &mut self.bodies,
            &self.depths,
            &self.locked_roots,
            self.alpha,
            &self.config,
        );
        forces::apply_vertical_center(&mut self.bodies, self.alpha, &self.config);
        forces::apply_right_bias(&mut self.bodies, &self.edges, self.alpha, &self.config);

        let keep = (1.0 - self.config.velocity_decay).powf(dt);
        for body in &mut self.bodies {
            body.vx *= keep;
            body.vy *= keep;
            body.x += body.vx * dt;
            body.y += body.vy * dt;
            if let Some(fx) = body.fx {
                body.x = fx;
                body.vx = 0.0;
            }
            if let Some(fy) = body.fy {
                body.y = fy;
                body.vy = 0.0;
            }
        }

        self.check_settled();
    }

    fn max_velocity(&self) -> f32 {
        self.bodies
            .iter()
            .map(|b| b.vx.abs() + b.vy.abs())
            .fold(0.0, f32::max)
    }

    fn check_settled(&mut self) {
        if self.drag_count > 0 || self.alpha > SETTLE_ALPHA {
            self.settle_count = 0;
            return;
        }
        if self.max_velocity() < SETTLE_VELOCITY {
            self.settle_count += 1;
            if self.settle_count >= SETTLE_STEPS {
                self.settled = true;
                self.alpha_target = 0.0;
            }
        } else {
            self.settle_count = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use questtree_domain::QuestRow;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn small_graph() -> QuestGraph {
        let rows = vec![
            QuestRow {
                name: "A".to_string(),
                leads_to: Some("B".to_string()),
                ..Default::default()
            },
            QuestRow {
                name: "B".to_string(),
                leads_to: Some("C".to_string()),
                ..Default::default()
            },
        ];
        build_graph(&rows, &HashMap::new())
    }

    fn sim(graph: &QuestGraph) -> Simulation {
        let mut rng = StdRng::seed_from_u64(7);
        Simulation::new(graph, LayoutConfig::default(), &mut rng)
    }

    #[test]
    fn test_starts_cold_and_warms_up() {
        let graph = small_graph();
        let mut sim = sim(&graph);
        assert_eq!(sim.phase(), SimPhase::Cold);
        sim.warmup();
        assert_eq!(sim.phase(), SimPhase::Warming);
        assert!(sim.alpha() >= 0.45);
    }

    #[test]
    fn test_roots_stay_pinned_to_margin() {
        let graph = small_graph();
        let mut sim = sim(&graph);
        sim.warmup();
        for _ in 0..100 {
            sim.step(1.0);
        }
        let root = graph.index_of("A").expect("node exists");
        assert!((sim.body(root).x - LayoutConfig::default().margin).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cooldown_transitions_to_cooling() {
        let graph = small_graph();
        let mut sim = sim(&graph);
        sim.warmup();
        // Drive past the 20-unit cool-down window.
        for _ in 0..25 {
            sim.step(1.0);
        }
        assert_ne!(sim.phase(), SimPhase::Warming);
    }

    #[test]
    fn test_settles_and_stops() {
        let graph = small_graph();
        let mut sim = sim(&graph);
        sim.warmup();
        for _ in 0..5000 {
            sim.step(1.0);
            if sim.is_settled() {
                break;
            }
        }
        assert!(sim.is_settled());
        assert_eq!(sim.phase(), SimPhase::Settled);

        // A settled simulation no longer moves.
        let before: Vec<(f32, f32)> = sim.bodies().iter().map(|b| (b.x, b.y)).collect();
        sim.step(1.0);
        let after: Vec<(f32, f32)> = sim.bodies().iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_interaction_reenters_warming_after_settle() {
        let graph = small_graph();
        let mut sim = sim(&graph);
        sim.warmup();
        for _ in 0..5000 {
            sim.step(1.0);
            if sim.is_settled() {
                break;
            }
        }
        assert!(sim.is_settled());
        sim.warmup();
        assert_eq!(sim.phase(), SimPhase::Warming);
        assert!(!sim.is_settled());
    }

    #[test]
    fn test_drag_blocks_settling_and_pins_node() {
        let graph = small_graph();
        let mut sim = sim(&graph);
        sim.warmup();
        let target = graph.index_of("B").expect("node exists");
        sim.begin_drag(target);
        sim.drag_to(target, 500.0, 300.0);
        for _ in 0..200 {
            sim.step(1.0);
        }
        assert!(!sim.is_settled());
        assert!((sim.body(target).x - 500.0).abs() < f32::EPSILON);
        assert!((sim.body(target).y - 300.0).abs() < f32::EPSILON);

        sim.end_drag(target);
        // Released node is free again on both axes.
        assert!(sim.body(target).fx.is_none());
        assert!(sim.body(target).fy.is_none());
    }

    #[test]
    fn test_root_drag_keeps_margin_pin_on_release() {
        let graph = small_graph();
        let mut sim = sim(&graph);
        let root = graph.index_of("A").expect("node exists");
        sim.begin_drag(root);
        sim.drag_to(root, 400.0, 250.0);
        sim.end_drag(root);
        assert_eq!(sim.body(root).fx, Some(LayoutConfig::default().margin));
        assert_eq!(sim.body(root).fy, None);
    }
}
