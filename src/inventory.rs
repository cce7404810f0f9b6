//! The user's filament inventory.
//!
//! `InventoryStore` owns the item list and applies item- and spool-level
//! mutations. Mutations aimed at an unknown item or spool are skipped
//! without error and report that through their return value, so repeating
//! a call is always safe.

use crate::catalog::{CatalogRepository, ColorPath};
use crate::model::{ColorId, Diameter, InventoryItem, ItemId, Spool, SpoolId};

/// Errors from creating or reshaping inventory items.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InventoryError {
    /// A required name was empty after trimming
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    /// Nominal weight must be a positive number of grams
    #[error("Invalid weight: {0} g")]
    InvalidWeight(f64),

    /// New items need at least one spool
    #[error("An item needs at least one spool")]
    NoSpools,

    /// Referenced catalog color does not exist or has no parents
    #[error("Catalog color not found: {0}")]
    ColorNotFound(ColorId),
}

fn check_weight(grams: f64) -> Result<(), InventoryError> {
    if grams.is_finite() && grams > 0.0 {
        Ok(())
    } else {
        Err(InventoryError::InvalidWeight(grams))
    }
}

impl InventoryItem {
    /// Copy names and color out of a catalog entry.
    ///
    /// The item keeps no link to the catalog; deleting the entry later does
    /// not affect it.
    pub fn from_catalog(path: &ColorPath<'_>) -> Self {
        InventoryItem::new(
            path.brand.name.clone(),
            path.material_type.name.clone(),
            path.color.name.clone(),
        )
        .with_color(path.color.color)
    }
}

/// Ordered collection of inventory items.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    items: Vec<InventoryItem>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap items loaded from storage as-is.
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut InventoryItem> {
        let item = self.items.iter_mut().find(|i| i.id == id);
        if item.is_none() {
            log::debug!("Unknown inventory item {}, skipping", id);
        }
        item
    }

    /// Items whose brand matches exactly.
    pub fn items_by_brand(&self, brand: &str) -> Vec<&InventoryItem> {
        self.items.iter().filter(|i| i.brand == brand).collect()
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Validate and append an item.
    ///
    /// Names are trimmed; brand, material and color must be non-empty, the
    /// weight positive and at least one spool present.
    pub fn add_item(&mut self, mut item: InventoryItem) -> Result<ItemId, InventoryError> {
        for (value, field) in [
            (&mut item.brand, "Brand"),
            (&mut item.material_type_name, "Material type"),
            (&mut item.color_name, "Color name"),
        ] {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(InventoryError::EmptyName { field });
            }
            *value = trimmed.to_string();
        }
        check_weight(item.weight_grams)?;
        if item.spools.is_empty() {
            return Err(InventoryError::NoSpools);
        }

        let id = item.id;
        log::info!(
            "Added {} {} ({} spools)",
            item.display_name(),
            item.color_name,
            item.spools.len()
        );
        self.items.push(item);
        Ok(id)
    }

    /// Add `spool_count` full spools of a catalog color.
    pub fn add_from_catalog(
        &mut self,
        catalog: &CatalogRepository,
        color: ColorId,
        weight_grams: f64,
        diameter: Diameter,
        spool_count: usize,
    ) -> Result<ItemId, InventoryError> {
        let path = catalog
            .color_path(color)
            .ok_or(InventoryError::ColorNotFound(color))?;
        let item = InventoryItem::from_catalog(&path)
            .with_weight(weight_grams)
            .with_diameter(diameter)
            .with_spools((0..spool_count).map(|_| Spool::full()).collect());
        self.add_item(item)
    }

    /// Remove an item together with all of its spools.
    pub fn delete_item(&mut self, id: ItemId) -> Option<InventoryItem> {
        let Some(index) = self.items.iter().position(|i| i.id == id) else {
            log::debug!("delete_item: unknown item {}", id);
            return None;
        };
        let item = self.items.remove(index);
        log::info!("Deleted {} {}", item.display_name(), item.color_name);
        Some(item)
    }

    pub fn update_item_notes(&mut self, id: ItemId, notes: &str) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.notes = notes.to_string();
        true
    }

    /// Change the nominal weight. `Ok(false)` for unknown items.
    pub fn set_weight(&mut self, id: ItemId, grams: f64) -> Result<bool, InventoryError> {
        check_weight(grams)?;
        let Some(item) = self.get_mut(id) else {
            return Ok(false);
        };
        item.weight_grams = grams;
        Ok(true)
    }

    pub fn set_diameter(&mut self, id: ItemId, diameter: Diameter) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.diameter_mm = diameter;
        true
    }

    // ========================================================================
    // Spools
    // ========================================================================

    /// Set a spool's remaining percentage, clamped into `0..=100`.
    pub fn update_percentage(&mut self, item: ItemId, spool: SpoolId, pct: f64) -> bool {
        let Some(spool) = self.get_mut(item).and_then(|i| i.spool_mut(spool)) else {
            return false;
        };
        spool.set_remaining_percentage(pct);
        log::debug!(
            "Spool {} now at {:.1}%",
            spool.id,
            spool.remaining_percentage()
        );
        true
    }

    pub fn update_spool_notes(&mut self, item: ItemId, spool: SpoolId, notes: &str) -> bool {
        let Some(spool) = self.get_mut(item).and_then(|i| i.spool_mut(spool)) else {
            return false;
        };
        spool.notes = notes.to_string();
        true
    }

    /// Append a spool to an item.
    pub fn add_spool(&mut self, item: ItemId, pct: f64, notes: &str) -> Option<SpoolId> {
        let item = self.get_mut(item)?;
        let spool = Spool::new(pct, notes);
        let id = spool.id;
        item.spools.push(spool);
        Some(id)
    }

    /// Remove a spool. Removing the last one leaves the item with none.
    pub fn remove_spool(&mut self, item: ItemId, spool: SpoolId) -> Option<Spool> {
        let item = self.get_mut(item)?;
        let index = item.spools.iter().position(|s| s.id == spool)?;
        Some(item.spools.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::model::FilamentColor;

    fn store_with_item() -> (InventoryStore, ItemId, SpoolId) {
        let mut store = InventoryStore::new();
        let item = InventoryItem::new("Acme", "PLA", "Red");
        let spool = item.spools[0].id;
        let id = store.add_item(item).unwrap();
        (store, id, spool)
    }

    fn pct(store: &InventoryStore, item: ItemId, spool: SpoolId) -> f64 {
        store
            .get(item)
            .and_then(|i| i.spool(spool))
            .map(Spool::remaining_percentage)
            .unwrap()
    }

    #[test]
    fn test_update_percentage_clamps() {
        let (mut store, item, spool) = store_with_item();

        assert!(store.update_percentage(item, spool, -10.0));
        assert_eq!(pct(&store, item, spool), 0.0);

        assert!(store.update_percentage(item, spool, 150.0));
        assert_eq!(pct(&store, item, spool), 100.0);

        assert!(store.update_percentage(item, spool, 42.5));
        assert_eq!(pct(&store, item, spool), 42.5);
    }

    #[test]
    fn test_update_percentage_unknown_ids_are_skipped() {
        let (mut store, item, spool) = store_with_item();
        let before = store.items().to_vec();

        assert!(!store.update_percentage(ItemId::new(), spool, 10.0));
        assert!(!store.update_percentage(item, SpoolId::new(), 10.0));
        assert_eq!(store.items(), before.as_slice());
    }

    #[test]
    fn test_add_and_remove_spools() {
        let (mut store, item, first) = store_with_item();

        let second = store.add_spool(item, 100.0, "").unwrap();
        let third = store.add_spool(item, 30.0, "dryer").unwrap();
        assert_eq!(store.get(item).unwrap().spools.len(), 3);
        assert_eq!(store.get(item).unwrap().spool(third).unwrap().notes, "dryer");
        assert!(store.add_spool(ItemId::new(), 100.0, "").is_none());

        assert!(store.remove_spool(item, second).is_some());
        assert!(store.remove_spool(item, second).is_none());
        assert!(store.remove_spool(item, first).is_some());
        assert!(store.remove_spool(item, third).is_some());

        // No spools left is a valid state
        let emptied = store.get(item).unwrap();
        assert!(emptied.spools.is_empty());
        assert_eq!(emptied.average_remaining_percentage(), 0.0);
    }

    #[test]
    fn test_delete_item() {
        let (mut store, item, _) = store_with_item();
        let removed = store.delete_item(item).unwrap();
        assert_eq!(removed.spools.len(), 1);
        assert!(store.is_empty());
        assert!(store.delete_item(item).is_none());
    }

    #[test]
    fn test_add_item_validation() {
        let mut store = InventoryStore::new();
        assert_eq!(
            store.add_item(InventoryItem::new(" ", "PLA", "Red")),
            Err(InventoryError::EmptyName { field: "Brand" })
        );
        assert_eq!(
            store.add_item(InventoryItem::new("Acme", "PLA", "Red").with_weight(0.0)),
            Err(InventoryError::InvalidWeight(0.0))
        );
        assert_eq!(
            store.add_item(InventoryItem::new("Acme", "PLA", "Red").with_spools(Vec::new())),
            Err(InventoryError::NoSpools)
        );
        assert!(store.is_empty());

        let id = store
            .add_item(InventoryItem::new(" Acme ", "PLA", "Red"))
            .unwrap();
        assert_eq!(store.get(id).unwrap().brand, "Acme");
    }

    #[test]
    fn test_notes_weight_and_diameter() {
        let (mut store, item, spool) = store_with_item();
        assert!(store.update_item_notes(item, "top shelf"));
        assert!(store.update_spool_notes(item, spool, "opened"));
        assert_eq!(store.set_weight(item, 500.0), Ok(true));
        assert_eq!(store.set_weight(ItemId::new(), 500.0), Ok(false));
        assert!(store.set_weight(item, -1.0).is_err());
        assert!(store.set_diameter(item, Diameter::D285));

        let stored = store.get(item).unwrap();
        assert_eq!(stored.notes, "top shelf");
        assert_eq!(stored.spool(spool).unwrap().notes, "opened");
        assert_eq!(stored.weight_grams, 500.0);
        assert_eq!(stored.diameter_mm, Diameter::D285);
    }

    #[test]
    fn test_add_from_catalog_copies_by_value() {
        let mut catalog = CatalogRepository::new();
        let brand = catalog.add_brand("Acme").unwrap();
        let pla = catalog.add_material_type(brand, "PLA", None).unwrap();
        let teal = ColorValue::from_rgb8(0, 128, 128);
        let color = catalog.add_color(FilamentColor::new(pla, "Teal", teal)).unwrap();

        let mut store = InventoryStore::new();
        let id = store
            .add_from_catalog(&catalog, color, 1000.0, Diameter::D175, 2)
            .unwrap();

        catalog.delete_brand(brand);

        let item = store.get(id).unwrap();
        assert_eq!(item.brand, "Acme");
        assert_eq!(item.material_type_name, "PLA");
        assert_eq!(item.color_name, "Teal");
        assert_eq!(item.resolved_color(), teal);
        assert_eq!(item.spools.len(), 2);

        assert_eq!(
            store.add_from_catalog(&catalog, color, 1000.0, Diameter::D175, 1),
            Err(InventoryError::ColorNotFound(color))
        );
    }

    #[test]
    fn test_items_by_brand_is_case_sensitive() {
        let mut store = InventoryStore::new();
        store.add_item(InventoryItem::new("Acme", "PLA", "Red")).unwrap();
        store.add_item(InventoryItem::new("acme", "PLA", "Red")).unwrap();
        assert_eq!(store.items_by_brand("Acme").len(), 1);
    }
}
