//! In-memory backend, for tests and ephemeral sessions.

use super::{CatalogSnapshot, InventorySnapshot, Persistence, StorageError};

/// Keeps serialized snapshots in memory.
///
/// Snapshots go through the same JSON encoding as the file store, so a
/// session reopened on the same `MemoryStore` sees exactly what a file
/// round-trip would give.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Option<String>,
    inventory: Option<String>,
    fail_writes: bool,
    catalog_saves: usize,
    inventory_saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save fail with `StorageError::Unavailable`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful catalog saves.
    pub fn catalog_saves(&self) -> usize {
        self.catalog_saves
    }

    /// Number of successful inventory saves.
    pub fn inventory_saves(&self) -> usize {
        self.inventory_saves
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable(
                "memory store is read-only".to_string(),
            ));
        }
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load_catalog(&self) -> Result<Option<CatalogSnapshot>, StorageError> {
        self.catalog
            .as_deref()
            .map(CatalogSnapshot::from_json)
            .transpose()
    }

    fn save_catalog(&mut self, snapshot: &CatalogSnapshot) -> Result<(), StorageError> {
        self.check_writable()?;
        self.catalog = Some(snapshot.to_json()?);
        self.catalog_saves += 1;
        Ok(())
    }

    fn load_inventory(&self) -> Result<Option<InventorySnapshot>, StorageError> {
        self.inventory
            .as_deref()
            .map(InventorySnapshot::from_json)
            .transpose()
    }

    fn save_inventory(&mut self, snapshot: &InventorySnapshot) -> Result<(), StorageError> {
        self.check_writable()?;
        self.inventory = Some(snapshot.to_json()?);
        self.inventory_saves += 1;
        Ok(())
    }
}
