//! QuestTree Engine library.
//!
//! This crate contains the quest graph construction and the interactive
//! exploration engine.
//!
//! ## Structure
//!
//! - `graph/` - Deduplicated node/edge graph construction and depth assignment
//! - `layout/` - Force-directed simulation with settle detection
//! - `explore/` - Selection, progress/availability, filter, and search subsystems
//! - `infrastructure/` - Storage port and adapters
//! - `payload` - Serialization contract between construction and exploration
//! - `explorer` - Engine context composing all subsystems

pub mod explore;
pub mod explorer;
pub mod graph;
pub mod infrastructure;
pub mod layout;
pub mod payload;

pub use explorer::Explorer;
pub use graph::{build_graph, QuestGraph};
