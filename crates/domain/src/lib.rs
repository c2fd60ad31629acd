//! QuestTree domain types.
//!
//! Pure data layer for the quest dependency graph: raw rows as delivered by
//! the scraping collaborator, merged quest nodes, relation/reward text
//! parsing, and completion-progress records. No I/O lives here.

pub mod error;
pub mod progress;
pub mod quest;
pub mod relations;
pub mod rewards;

pub use error::DomainError;
pub use progress::{ProgressRecord, QuestStatus, PROGRESS_VERSION};
pub use quest::{Edge, QuestNode, QuestRow};
pub use relations::{parse_required_level, split_locations, split_relations};
pub use rewards::{
    bucketize, classify, has_unlocks, parse_item_reward, parse_unlock, parse_xp, unlock_kinds,
    RewardBucket, RewardCategory, UnlockKind, UnlockReward,
};
