//! JSON files in a data directory.

use std::path::{Path, PathBuf};

use super::{CatalogSnapshot, InventorySnapshot, Persistence, StorageError};
use crate::constants::{CATALOG_FILE_NAME, INVENTORY_FILE_NAME};

/// Stores `catalog.json` and `inventory.json` side by side in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir` for storage. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(CATALOG_FILE_NAME)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.dir.join(INVENTORY_FILE_NAME)
    }

    fn read(path: &Path) -> Result<Option<String>, StorageError> {
        if !path.exists() {
            log::debug!("No stored file at {:?}", path);
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    /// Write through a temporary file so a failed write never truncates
    /// the previous snapshot.
    fn write(&self, path: &Path, json: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        log::debug!("Saved {} bytes to {:?}", json.len(), path);
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn load_catalog(&self) -> Result<Option<CatalogSnapshot>, StorageError> {
        let path = self.catalog_path();
        let Some(json) = Self::read(&path)? else {
            return Ok(None);
        };
        let snapshot = CatalogSnapshot::from_json(&json)?;
        log::info!(
            "Loaded catalog with {} brands from {:?}",
            snapshot.brands.len(),
            path
        );
        Ok(Some(snapshot))
    }

    fn save_catalog(&mut self, snapshot: &CatalogSnapshot) -> Result<(), StorageError> {
        let json = snapshot.to_json()?;
        self.write(&self.catalog_path(), &json)
    }

    fn load_inventory(&self) -> Result<Option<InventorySnapshot>, StorageError> {
        let path = self.inventory_path();
        let Some(json) = Self::read(&path)? else {
            return Ok(None);
        };
        let snapshot = InventorySnapshot::from_json(&json)?;
        log::info!(
            "Loaded inventory with {} items from {:?}",
            snapshot.items.len(),
            path
        );
        Ok(Some(snapshot))
    }

    fn save_inventory(&mut self, snapshot: &InventorySnapshot) -> Result<(), StorageError> {
        let json = snapshot.to_json()?;
        self.write(&self.inventory_path(), &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRepository;
    use crate::model::InventoryItem;

    #[test]
    fn test_missing_files_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));
        assert!(store.load_catalog().unwrap().is_none());
        assert!(store.load_inventory().unwrap().is_none());
    }

    #[test]
    fn test_file_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("data"));

        let mut catalog = CatalogRepository::new();
        catalog.seed_if_empty();
        store.save_catalog(&catalog.to_snapshot()).unwrap();

        let item = InventoryItem::new("Acme", "PLA", "Red").with_notes("shelf 2");
        let id = item.id;
        store
            .save_inventory(&InventorySnapshot::new(vec![item]))
            .unwrap();

        assert!(store.catalog_path().exists());
        assert!(!store.catalog_path().with_extension("json.tmp").exists());

        let loaded = store.load_catalog().unwrap().unwrap();
        assert_eq!(loaded.brands.len(), catalog.brand_count());
        assert_eq!(loaded.colors.len(), catalog.color_count());

        let inventory = store.load_inventory().unwrap().unwrap();
        assert_eq!(inventory.items.len(), 1);
        assert_eq!(inventory.items[0].id, id);
        assert_eq!(inventory.items[0].notes, "shelf 2");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.inventory_path(), "[oops").unwrap();
        assert!(matches!(
            store.load_inventory(),
            Err(StorageError::Json(_))
        ));
    }
}
