//! Storage infrastructure: the key/value port and its adapters.

pub mod ports;
pub mod stores;

pub use ports::{namespaces, KeyValueStore};
pub use stores::{JsonFileStore, MemoryStore, StoreError};
