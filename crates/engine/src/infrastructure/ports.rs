//! Port traits for infrastructure boundaries.
//!
//! The key/value store is the ONLY abstraction in the engine; everything
//! else is concrete types. It models collaborator-provided persistence
//! (browser localStorage in the reference deployment): reads return empty
//! state when storage is unavailable, and writes fail silently rather than
//! crash the engine.

#[cfg(test)]
use mockall::automock;

/// Fixed persistence namespaces.
///
/// Progress and the important-quest flag set are deliberately kept under
/// separate keys so either can be cleared or imported without the other.
pub mod namespaces {
    /// Versioned progress document.
    pub const PROGRESS: &str = "tarkov-quest-progress";
    /// Opt-in flag; statuses only load once this has been written.
    pub const PROGRESS_ENABLED: &str = "tarkov-quest-progress-enabled";
    /// Bare JSON array of important quest ids.
    pub const IMPORTANT: &str = "tarkov-quest-important";
}

/// Collaborator-provided key/value persistence.
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync {
    /// Reads a namespace; `None` when absent or storage is unavailable.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a namespace. Failures (quota, private mode) are swallowed by
    /// the adapter; callers never observe them.
    fn put(&self, key: &str, value: &str);

    /// Removes a namespace, silently.
    fn remove(&self, key: &str);
}
