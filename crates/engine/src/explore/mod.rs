//! Exploration subsystems.
//!
//! Event-driven readers and writers of shared graph state: ancestry
//! highlighting, completion progress and availability, faceted filtering,
//! and multi-mode search. All operations are synchronous and atomic; only
//! the progress subsystem writes statuses, and nothing here mutates graph
//! topology.

pub mod filter;
pub mod progress;
pub mod search;
pub mod selection;

pub use filter::{FacetOptions, FilterState, FilterView, TextFacet};
pub use progress::ProgressTracker;
pub use search::{search, NameHit, SearchGroup, SearchHit, SearchMode, SearchResults};
pub use selection::{collect_ancestors, collect_descendants, Highlight};
