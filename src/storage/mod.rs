//! Persistence for the catalog and the inventory.
//!
//! The core talks to storage only through the [`Persistence`] trait. Two
//! backends are provided:
//!
//! - **JsonFileStore**: `catalog.json` and `inventory.json` in a data directory
//! - **MemoryStore**: serialized snapshots kept in memory
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spooldex::storage::{JsonFileStore, Persistence};
//!
//! let store = JsonFileStore::new("/home/me/.local/share/spooldex");
//! let catalog = store.load_catalog()?;
//! ```

mod error;
mod json_file;
mod memory;
mod snapshot;
mod traits;

pub use error::StorageError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::{
    CatalogSnapshot, InventorySnapshot, SNAPSHOT_VERSION, SNAPSHOT_VERSION_MAJOR, parse_version,
};
pub use traits::Persistence;
