//! The persistence boundary of the core.

use super::{CatalogSnapshot, InventorySnapshot, StorageError};

/// Storage backend for the catalog and the inventory.
///
/// Loads happen once at startup; saves are requested after every mutating
/// operation and are synchronous from the caller's point of view. The two
/// halves are stored independently.
pub trait Persistence {
    /// Load the stored catalog, or `None` if nothing was saved yet.
    fn load_catalog(&self) -> Result<Option<CatalogSnapshot>, StorageError>;

    /// Replace the stored catalog.
    fn save_catalog(&mut self, snapshot: &CatalogSnapshot) -> Result<(), StorageError>;

    /// Load the stored inventory, or `None` if nothing was saved yet.
    fn load_inventory(&self) -> Result<Option<InventorySnapshot>, StorageError>;

    /// Replace the stored inventory.
    fn save_inventory(&mut self, snapshot: &InventorySnapshot) -> Result<(), StorageError>;
}
