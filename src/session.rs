//! Application-scoped owner of the catalog, the inventory and their storage.
//!
//! A `Session` is constructed once at startup and handed to whatever needs
//! it. Every successful mutation is followed by a save of the affected half
//! (catalog or inventory). Save failures are logged and the in-memory state
//! is kept as is.

use crate::catalog::{CatalogError, CatalogRepository};
use crate::config::AppConfig;
use crate::constants::DEFAULT_LOW_STOCK_PERCENTAGE;
use crate::inventory::{InventoryError, InventoryStore};
use crate::model::{
    BrandId, ColorId, DEFAULT_WEIGHT_GRAMS, Diameter, FilamentColor, InventoryItem, ItemId,
    MaterialTypeId, Spool, SpoolId,
};
use crate::seed;
use crate::stats::{self, InventorySummary};
use crate::storage::{InventorySnapshot, Persistence};

/// Startup behaviour and defaults for new items.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub seed_sample_inventory: bool,
    pub default_weight_grams: f64,
    pub default_diameter: Diameter,
    pub low_stock_percentage: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed_sample_inventory: true,
            default_weight_grams: DEFAULT_WEIGHT_GRAMS,
            default_diameter: Diameter::default(),
            low_stock_percentage: DEFAULT_LOW_STOCK_PERCENTAGE,
        }
    }
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        let prefs = &config.preferences;
        Self {
            seed_sample_inventory: prefs.seed_sample_inventory,
            default_weight_grams: prefs.default_weight_grams,
            default_diameter: prefs.default_diameter,
            low_stock_percentage: prefs.low_stock_percentage,
        }
    }
}

/// What [`Session::open`] seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub catalog: bool,
    pub sample_items: usize,
}

pub struct Session<P: Persistence> {
    catalog: CatalogRepository,
    inventory: InventoryStore,
    persistence: P,
    options: SessionOptions,
    /// Set when the stored half could not be read; it is then never saved
    /// over.
    catalog_read_only: bool,
    inventory_read_only: bool,
    seeded: SeedReport,
}

impl<P: Persistence> Session<P> {
    /// Load both halves from `persistence` and seed whatever is empty.
    ///
    /// Opening never fails. A half whose stored data cannot be read (corrupt
    /// or written by a newer version) starts empty, is not seeded and is not
    /// saved for the rest of the session, so the stored file stays intact.
    pub fn open(persistence: P, options: SessionOptions) -> Self {
        let mut catalog_read_only = false;
        let catalog = match persistence.load_catalog() {
            Ok(Some(snapshot)) => CatalogRepository::from_snapshot(snapshot),
            Ok(None) => CatalogRepository::new(),
            Err(e) => {
                log::error!("Could not load catalog, it will not be saved this session: {}", e);
                catalog_read_only = true;
                CatalogRepository::new()
            }
        };
        let mut inventory_read_only = false;
        let inventory = match persistence.load_inventory() {
            Ok(Some(snapshot)) => InventoryStore::from_items(snapshot.items),
            Ok(None) => InventoryStore::new(),
            Err(e) => {
                log::error!("Could not load inventory, it will not be saved this session: {}", e);
                inventory_read_only = true;
                InventoryStore::new()
            }
        };

        let mut session = Self {
            catalog,
            inventory,
            persistence,
            options,
            catalog_read_only,
            inventory_read_only,
            seeded: SeedReport::default(),
        };

        session.seeded.catalog = session.seed_catalog();
        if session.options.seed_sample_inventory {
            session.seeded.sample_items = session.seed_sample_inventory();
        }

        log::info!(
            "Session open: {} colors in catalog, {} inventory items",
            session.catalog.color_count(),
            session.inventory.len()
        );
        session
    }

    pub fn catalog(&self) -> &CatalogRepository {
        &self.catalog
    }

    pub fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Seeding done while opening.
    pub fn seeded_on_open(&self) -> SeedReport {
        self.seeded
    }

    /// The stored catalog could not be read and is left untouched.
    pub fn catalog_read_only(&self) -> bool {
        self.catalog_read_only
    }

    /// The stored inventory could not be read and is left untouched.
    pub fn inventory_read_only(&self) -> bool {
        self.inventory_read_only
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Consume the session, returning the storage backend.
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Add the demo items if the inventory is empty. Returns how many were
    /// added.
    pub fn seed_sample_inventory(&mut self) -> usize {
        if self.inventory_read_only || !self.inventory.is_empty() {
            return 0;
        }
        let mut added = 0;
        for item in seed::sample_inventory() {
            match self.inventory.add_item(item) {
                Ok(_) => added += 1,
                Err(e) => log::warn!("Skipping sample item: {}", e),
            }
        }
        if added > 0 {
            log::info!("Seeded {} sample inventory items", added);
            self.persist_inventory();
        }
        added
    }

    /// Insert the starter catalog if the catalog is empty.
    pub fn seed_catalog(&mut self) -> bool {
        if self.catalog_read_only {
            return false;
        }
        let seeded = self.catalog.seed_if_empty();
        if seeded {
            self.persist_catalog();
        }
        seeded
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub fn search(&self, query: &str) -> Vec<&FilamentColor> {
        self.catalog.search(query)
    }

    pub fn add_brand(&mut self, name: &str) -> Result<BrandId, CatalogError> {
        let id = self.catalog.add_brand(name)?;
        self.persist_catalog();
        Ok(id)
    }

    pub fn add_material_type(
        &mut self,
        brand: BrandId,
        name: &str,
        properties: Option<&str>,
    ) -> Result<MaterialTypeId, CatalogError> {
        let id = self.catalog.add_material_type(brand, name, properties)?;
        self.persist_catalog();
        Ok(id)
    }

    pub fn add_color(&mut self, color: FilamentColor) -> Result<ColorId, CatalogError> {
        let id = self.catalog.add_color(color)?;
        self.persist_catalog();
        Ok(id)
    }

    /// Delete a brand and everything under it. Inventory items that were
    /// created from it are left untouched.
    pub fn delete_brand(&mut self, id: BrandId) -> bool {
        let deleted = self.catalog.delete_brand(id);
        if deleted {
            self.persist_catalog();
        }
        deleted
    }

    pub fn delete_material_type(&mut self, id: MaterialTypeId) -> bool {
        let deleted = self.catalog.delete_material_type(id);
        if deleted {
            self.persist_catalog();
        }
        deleted
    }

    pub fn delete_color(&mut self, id: ColorId) -> bool {
        let deleted = self.catalog.delete_color(id);
        if deleted {
            self.persist_catalog();
        }
        deleted
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    pub fn add_item(&mut self, item: InventoryItem) -> Result<ItemId, InventoryError> {
        let id = self.inventory.add_item(item)?;
        self.persist_inventory();
        Ok(id)
    }

    /// Add full spools of a catalog color using the configured weight and
    /// diameter.
    pub fn add_from_catalog(
        &mut self,
        color: ColorId,
        spool_count: usize,
    ) -> Result<ItemId, InventoryError> {
        let id = self.inventory.add_from_catalog(
            &self.catalog,
            color,
            self.options.default_weight_grams,
            self.options.default_diameter,
            spool_count,
        )?;
        self.persist_inventory();
        Ok(id)
    }

    pub fn delete_item(&mut self, id: ItemId) -> Option<InventoryItem> {
        let removed = self.inventory.delete_item(id);
        if removed.is_some() {
            self.persist_inventory();
        }
        removed
    }

    pub fn update_item_notes(&mut self, id: ItemId, notes: &str) -> bool {
        let updated = self.inventory.update_item_notes(id, notes);
        if updated {
            self.persist_inventory();
        }
        updated
    }

    pub fn set_weight(&mut self, id: ItemId, grams: f64) -> Result<bool, InventoryError> {
        let updated = self.inventory.set_weight(id, grams)?;
        if updated {
            self.persist_inventory();
        }
        Ok(updated)
    }

    pub fn set_diameter(&mut self, id: ItemId, diameter: Diameter) -> bool {
        let updated = self.inventory.set_diameter(id, diameter);
        if updated {
            self.persist_inventory();
        }
        updated
    }

    pub fn update_percentage(&mut self, item: ItemId, spool: SpoolId, pct: f64) -> bool {
        let updated = self.inventory.update_percentage(item, spool, pct);
        if updated {
            self.persist_inventory();
        }
        updated
    }

    pub fn update_spool_notes(&mut self, item: ItemId, spool: SpoolId, notes: &str) -> bool {
        let updated = self.inventory.update_spool_notes(item, spool, notes);
        if updated {
            self.persist_inventory();
        }
        updated
    }

    pub fn add_spool(&mut self, item: ItemId, pct: f64, notes: &str) -> Option<SpoolId> {
        let id = self.inventory.add_spool(item, pct, notes);
        if id.is_some() {
            self.persist_inventory();
        }
        id
    }

    pub fn remove_spool(&mut self, item: ItemId, spool: SpoolId) -> Option<Spool> {
        let removed = self.inventory.remove_spool(item, spool);
        if removed.is_some() {
            self.persist_inventory();
        }
        removed
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn summary(&self) -> InventorySummary {
        InventorySummary::compute(self.inventory.items())
    }

    /// Items below the configured low-stock percentage.
    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        stats::low_stock(self.inventory.items(), self.options.low_stock_percentage)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    fn persist_catalog(&mut self) {
        if self.catalog_read_only {
            log::warn!("Catalog change kept in memory only; stored catalog is unreadable");
            return;
        }
        let snapshot = self.catalog.to_snapshot();
        if let Err(e) = self.persistence.save_catalog(&snapshot) {
            log::error!("Failed to save catalog: {}", e);
        }
    }

    fn persist_inventory(&mut self) {
        if self.inventory_read_only {
            log::warn!("Inventory change kept in memory only; stored inventory is unreadable");
            return;
        }
        let snapshot = InventorySnapshot::new(self.inventory.items().to_vec());
        if let Err(e) = self.persistence.save_inventory(&snapshot) {
            log::error!("Failed to save inventory: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStore, MemoryStore};
    use pretty_assertions::assert_eq;

    fn quiet() -> SessionOptions {
        SessionOptions {
            seed_sample_inventory: false,
            ..SessionOptions::default()
        }
    }

    fn first_color(session: &Session<MemoryStore>) -> ColorId {
        session.search("PLA Basic")[0].id
    }

    #[test]
    fn test_first_open_seeds_and_persists() {
        let session = Session::open(MemoryStore::new(), SessionOptions::default());
        assert!(!session.catalog().is_empty());
        assert_eq!(session.inventory().len(), seed::sample_inventory().len());
        assert_eq!(session.persistence().catalog_saves(), 1);
        assert_eq!(session.persistence().inventory_saves(), 1);
    }

    #[test]
    fn test_sample_inventory_is_optional() {
        let session = Session::open(MemoryStore::new(), quiet());
        assert!(session.inventory().is_empty());
        assert_eq!(session.persistence().inventory_saves(), 0);
    }

    #[test]
    fn test_reopen_does_not_reseed() {
        let session = Session::open(MemoryStore::new(), SessionOptions::default());
        let colors = session.catalog().color_count();
        let store = session.into_persistence();

        let reopened = Session::open(store, SessionOptions::default());
        assert_eq!(reopened.catalog().color_count(), colors);
        assert_eq!(reopened.inventory().len(), seed::sample_inventory().len());
        assert_eq!(reopened.persistence().catalog_saves(), 1);
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let mut session = Session::open(MemoryStore::new(), quiet());
        let color = first_color(&session);
        let item = session.add_from_catalog(color, 2).unwrap();
        let spool = session.inventory().get(item).unwrap().spools[0].id;
        assert!(session.update_percentage(item, spool, 35.0));
        assert!(session.update_item_notes(item, "drawer 2"));

        let reopened = Session::open(session.into_persistence(), quiet());
        let loaded = reopened.inventory().get(item).unwrap();
        assert_eq!(loaded.spools.len(), 2);
        assert_eq!(loaded.spool(spool).unwrap().remaining_percentage(), 35.0);
        assert_eq!(loaded.notes, "drawer 2");
        assert_eq!(loaded.weight_grams, DEFAULT_WEIGHT_GRAMS);
    }

    #[test]
    fn test_unknown_ids_do_not_save() {
        let mut session = Session::open(MemoryStore::new(), quiet());
        let saves = session.persistence().inventory_saves();
        assert!(!session.update_item_notes(ItemId::new(), "x"));
        assert!(session.delete_item(ItemId::new()).is_none());
        assert!(!session.delete_brand(BrandId::new()));
        assert_eq!(session.persistence().inventory_saves(), saves);
        assert_eq!(session.persistence().catalog_saves(), 1);
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut session = Session::open(store, quiet());
        assert!(!session.catalog().is_empty());

        let color = first_color(&session);
        let item = session.add_from_catalog(color, 1).unwrap();
        assert!(session.inventory().get(item).is_some());
        assert_eq!(session.persistence().inventory_saves(), 0);

        let reopened = Session::open(session.into_persistence(), quiet());
        assert!(reopened.inventory().get(item).is_none());
    }

    #[test]
    fn test_catalog_delete_leaves_inventory() {
        let mut session = Session::open(MemoryStore::new(), quiet());
        let color = first_color(&session);
        let brand = session.catalog().color_path(color).unwrap().brand.id;
        let item = session.add_from_catalog(color, 1).unwrap();

        assert!(session.delete_brand(brand));
        assert!(session.catalog().color(color).is_none());
        assert!(session.inventory().get(item).is_some());
        assert!(session.add_from_catalog(color, 1).is_err());
    }

    #[test]
    fn test_summary_and_low_stock() {
        let mut session = Session::open(MemoryStore::new(), quiet());
        let item = InventoryItem::new("Acme", "PLA", "Red")
            .with_spools(vec![Spool::new(10.0, ""), Spool::new(5.0, "")]);
        session.add_item(item).unwrap();

        let summary = session.summary();
        assert_eq!(summary.total_spools, 2);
        assert_eq!(summary.estimated_remaining_grams, 75.0);
        assert_eq!(session.low_stock().len(), 1);
    }

    #[test]
    fn test_sample_seeding_is_idempotent() {
        let mut session = Session::open(MemoryStore::new(), SessionOptions::default());
        let count = seed::sample_inventory().len();
        assert_eq!(
            session.seeded_on_open(),
            SeedReport {
                catalog: true,
                sample_items: count,
            }
        );

        assert_eq!(session.seed_sample_inventory(), 0);
        assert_eq!(session.seed_sample_inventory(), 0);
        assert_eq!(session.inventory().len(), count);
        assert!(!session.seed_catalog());
        assert_eq!(session.persistence().inventory_saves(), 1);
    }

    #[test]
    fn test_newer_inventory_file_is_left_intact() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let stored = r#"{"version":"2.0.0","items":[],"futureField":1}"#;
        std::fs::write(store.inventory_path(), stored).unwrap();

        let mut session = Session::open(store, SessionOptions::default());
        assert!(session.inventory_read_only());
        assert!(!session.catalog_read_only());
        assert!(session.inventory().is_empty());
        assert_eq!(session.seeded_on_open().sample_items, 0);
        assert!(session.persistence().catalog_path().exists());

        let color = session.search("PLA Basic")[0].id;
        let item = session.add_from_catalog(color, 1).unwrap();
        assert!(session.inventory().get(item).is_some());

        let on_disk = std::fs::read_to_string(session.persistence().inventory_path()).unwrap();
        assert_eq!(on_disk, stored);
    }

    #[test]
    fn test_corrupt_catalog_file_is_left_intact() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.catalog_path(), "{ not json").unwrap();

        let mut session = Session::open(store, quiet());
        assert!(session.catalog_read_only());
        assert!(session.catalog().is_empty());
        assert!(!session.seeded_on_open().catalog);
        assert!(session.add_brand("Acme").is_ok());

        let on_disk = std::fs::read_to_string(session.persistence().catalog_path()).unwrap();
        assert_eq!(on_disk, "{ not json");
    }
}
