//! Individual force passes.
//!
//! Each force accumulates into node velocities, scaled by the simulation's
//! energy (alpha). Application order matches force priority: link attraction,
//! many-body repulsion, collision avoidance, horizontal anchoring, vertical
//! centering, right bias.

use super::simulation::LayoutBody;
use super::LayoutConfig;

/// Pulls connected nodes toward the target separation distance.
pub(super) fn apply_links(
    bodies: &mut [LayoutBody],
    edges: &[(usize, usize)],
    alpha: f32,
    config: &LayoutConfig,
) {
    for &(source, target) in edges {
        let dx = bodies[target].x - bodies[source].x;
        let dy = bodies[target].y - bodies[source].y;
        let distance = (dx * dx + dy * dy).sqrt().max(1e-3);
        let pull = (distance - config.link_distance) / distance * config.link_strength * alpha;
        let fx = dx * pull * 0.5;
        let fy = dy * pull * 0.5;
        bodies[target].vx -= fx;
        bodies[target].vy -= fy;
        bodies[source].vx += fx;
        bodies[source].vy += fy;
    }
}

/// Size-independent many-body repulsion between all node pairs.
pub(super) fn apply_charge(bodies: &mut [LayoutBody], alpha: f32, config: &LayoutConfig) {
    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = bodies[j].x - bodies[i].x;
            let dy = bodies[j].y - bodies[i].y;
            let dist_sq = (dx * dx + dy * dy).max(1.0);
            let distance = dist_sq.sqrt();
            // Negative charge repels; falls off with squared distance.
            let force = config.charge_strength * alpha / dist_sq;
            let fx = dx / distance * force;
            let fy = dy / distance * force;
            bodies[i].vx += fx;
            bodies[i].vy += fy;
            bodies[j].vx -= fx;
            bodies[j].vy -= fy;
        }
    }
}

/// Hard separation for nodes closer than twice the collision radius.
pub(super) fn apply_collide(bodies: &mut [LayoutBody], config: &LayoutConfig) {
    let min_distance = config.collide_radius * 2.0;
    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = bodies[j].x - bodies[i].x;
            let dy = bodies[j].y - bodies[i].y;
            let distance = (dx * dx + dy * dy).sqrt().max(1e-3);
            if distance >= min_distance {
                continue;
            }
            let overlap = (min_distance - distance) / distance * 0.5;
            let fx = dx * overlap;
            let fy = dy * overlap;
            bodies[i].vx -= fx;
            bodies[i].vy -= fy;
            bodies[j].vx += fx;
            bodies[j].vy += fy;
        }
    }
}

/// Anchors each node toward its depth column; locked roots pull at full
/// strength, everything else at the configured free strength.
pub(super) fn apply_depth_anchor(
    bodies: &mut [LayoutBody],
    depths: &[u32],
    locked_roots: &[bool],
    alpha: f32,
    config: &LayoutConfig,
) {
    for (idx, body) in bodies.iter_mut().enumerate() {
        let target_x = config.margin + depths[idx] as f32 * config.column_gap;
        let strength = if locked_roots[idx] {
            1.0
        } else {
            config.anchor_strength_free
        };
        body.vx += (target_x - body.x) * strength * alpha;
    }
}

/// Mild pull toward the vertical center of the canvas.
pub(super) fn apply_vertical_center(bodies: &mut [LayoutBody], alpha: f32, config: &LayoutConfig) {
    let center_y = config.height / 2.0;
    for body in bodies.iter_mut() {
        body.vy += (center_y - body.y) * config.center_strength * alpha;
    }
}

/// Nudges each edge's target to sit right of its source by a fixed gap,
/// proportional to simulation temperature.
pub(super) fn apply_right_bias(
    bodies: &mut [LayoutBody],
    edges: &[(usize, usize)],
    alpha: f32,
    config: &LayoutConfig,
) {
    for &(source, target) in edges {
        let desired = bodies[source].x + config.right_bias_gap;
        let delta = desired - bodies[target].x;
        bodies[target].vx += delta * config.right_bias_strength * alpha;
    }
}
