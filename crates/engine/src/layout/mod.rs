//! Force-directed layout.
//!
//! Converts {nodes, edges, depth} into 2-D positions through an explicit
//! `step(dt)` simulation, callable from a real-time scheduler or from a test
//! harness driving fixed time steps. Settle detection halts the simulation
//! once velocities have decayed and no interaction is in flight.

mod forces;
mod simulation;

pub use simulation::{LayoutBody, SimPhase, Simulation};

/// Tunable layout parameters.
///
/// Defaults mirror the reference diagram: a 220px column per depth level,
/// link springs at 140px, and a gentle vertical centering pull.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Left margin; locked roots pin to this x.
    pub margin: f32,
    /// Horizontal gap between depth columns.
    pub column_gap: f32,
    pub width: f32,
    pub height: f32,
    /// Target separation for connected nodes.
    pub link_distance: f32,
    pub link_strength: f32,
    /// Many-body repulsion strength (negative repels).
    pub charge_strength: f32,
    /// Minimum node radius enforced by collision avoidance.
    pub collide_radius: f32,
    /// Horizontal anchor strength for non-root nodes (roots use 1.0).
    pub anchor_strength_free: f32,
    /// Vertical centering strength.
    pub center_strength: f32,
    /// Strength of the bias pushing edge targets right of their sources.
    pub right_bias_strength: f32,
    /// Desired horizontal gap for the right bias.
    pub right_bias_gap: f32,
    /// Fraction of velocity lost per unit time.
    pub velocity_decay: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 100.0,
            column_gap: 220.0,
            width: 1760.0,
            height: 900.0,
            link_distance: 140.0,
            link_strength: 0.7,
            charge_strength: -150.0,
            collide_radius: 18.0,
            anchor_strength_free: 0.6,
            center_strength: 0.02,
            right_bias_strength: 0.22,
            right_bias_gap: 90.0,
            velocity_decay: 0.42,
        }
    }
}
