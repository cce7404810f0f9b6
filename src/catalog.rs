//! Filament library repository.
//!
//! Holds the Brand -> MaterialType -> FilamentColor hierarchy as three flat
//! tables linked by parent ids, and provides the browse, search and
//! management operations over it. Deleting a parent cascades to every
//! descendant.

use std::cmp::Ordering;

use crate::model::{Brand, BrandId, ColorId, FilamentColor, MaterialType, MaterialTypeId};
use crate::seed;
use crate::storage::CatalogSnapshot;

/// Errors from catalog management operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Name was empty after trimming
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    /// Parent brand does not exist
    #[error("Brand not found: {0}")]
    BrandNotFound(BrandId),

    /// Parent material type does not exist
    #[error("Material type not found: {0}")]
    MaterialTypeNotFound(MaterialTypeId),
}

fn validated_name(name: &str, kind: &'static str) -> Result<String, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyName { kind });
    }
    Ok(trimmed.to_string())
}

/// A color together with its resolved parents.
#[derive(Debug, Clone, Copy)]
pub struct ColorPath<'a> {
    pub brand: &'a Brand,
    pub material_type: &'a MaterialType,
    pub color: &'a FilamentColor,
}

/// The filament library.
#[derive(Debug, Clone, Default)]
pub struct CatalogRepository {
    brands: Vec<Brand>,
    material_types: Vec<MaterialType>,
    colors: Vec<FilamentColor>,
}

impl CatalogRepository {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a catalog from its stored tables.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            brands: snapshot.brands,
            material_types: snapshot.material_types,
            colors: snapshot.colors,
        }
    }

    /// Copy the tables out for persistence.
    pub fn to_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot::new(
            self.brands.clone(),
            self.material_types.clone(),
            self.colors.clone(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    pub fn material_type_count(&self) -> usize {
        self.material_types.len()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Insert the starter library unless any brand already exists.
    ///
    /// Returns whether anything was inserted.
    pub fn seed_if_empty(&mut self) -> bool {
        if !self.brands.is_empty() {
            log::debug!(
                "Catalog already has {} brands, skipping seed",
                self.brands.len()
            );
            return false;
        }

        let starter = seed::starter_catalog();
        log::info!(
            "Seeding catalog with {} brands, {} material types, {} colors",
            starter.brands.len(),
            starter.material_types.len(),
            starter.colors.len()
        );
        self.brands.extend(starter.brands);
        self.material_types.extend(starter.material_types);
        self.colors.extend(starter.colors);
        true
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn brand(&self, id: BrandId) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }

    pub fn material_type(&self, id: MaterialTypeId) -> Option<&MaterialType> {
        self.material_types.iter().find(|m| m.id == id)
    }

    pub fn color(&self, id: ColorId) -> Option<&FilamentColor> {
        self.colors.iter().find(|c| c.id == id)
    }

    /// First brand whose name matches exactly (case-sensitive).
    pub fn brand_by_name(&self, name: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.name == name)
    }

    /// Resolve a color and both of its parents.
    ///
    /// Returns `None` for unknown colors and for colors whose parent chain
    /// is broken.
    pub fn color_path(&self, id: ColorId) -> Option<ColorPath<'_>> {
        self.resolve(self.color(id)?)
    }

    fn resolve<'a>(&'a self, color: &'a FilamentColor) -> Option<ColorPath<'a>> {
        let material_type = self.material_type(color.material_type_id)?;
        let brand = self.brand(material_type.brand_id)?;
        Some(ColorPath {
            brand,
            material_type,
            color,
        })
    }

    // ========================================================================
    // Browse
    // ========================================================================

    /// All brands, by name.
    pub fn fetch_brands(&self) -> Vec<&Brand> {
        let mut brands: Vec<&Brand> = self.brands.iter().collect();
        brands.sort_by(|a, b| a.name.cmp(&b.name));
        brands
    }

    /// Material types of one brand, by name. Empty for unknown brands.
    pub fn fetch_material_types(&self, brand: BrandId) -> Vec<&MaterialType> {
        let mut types: Vec<&MaterialType> = self
            .material_types
            .iter()
            .filter(|m| m.brand_id == brand)
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// Colors of one material type, by name. Empty for unknown types.
    pub fn fetch_colors(&self, material_type: MaterialTypeId) -> Vec<&FilamentColor> {
        let mut colors: Vec<&FilamentColor> = self
            .colors
            .iter()
            .filter(|c| c.material_type_id == material_type)
            .collect();
        colors.sort_by(|a, b| a.name.cmp(&b.name));
        colors
    }

    /// Colors sharing `id`'s base name under the same material type,
    /// including `id` itself. These are the with/without-spool variants.
    pub fn variants_of(&self, id: ColorId) -> Vec<&FilamentColor> {
        let Some(color) = self.color(id) else {
            return Vec::new();
        };
        let base = color.base_name();
        let mut variants: Vec<&FilamentColor> = self
            .colors
            .iter()
            .filter(|c| c.material_type_id == color.material_type_id && c.base_name() == base)
            .collect();
        variants.sort_by(|a, b| a.name.cmp(&b.name));
        variants
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Case-insensitive substring search over color, material type and
    /// brand names.
    ///
    /// An empty (or whitespace-only) query returns nothing. Results are
    /// ordered by brand name, then material type name, then color name.
    /// Colors whose parent chain cannot be resolved never match.
    pub fn search(&self, query: &str) -> Vec<&FilamentColor> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<ColorPath<'_>> = self
            .colors
            .iter()
            .filter_map(|color| self.resolve(color))
            .filter(|path| {
                path.color.name.to_lowercase().contains(&needle)
                    || path.material_type.name.to_lowercase().contains(&needle)
                    || path.brand.name.to_lowercase().contains(&needle)
            })
            .collect();

        hits.sort_by(compare_paths);
        log::trace!("Search {:?} matched {} colors", query, hits.len());
        hits.into_iter().map(|path| path.color).collect()
    }

    // ========================================================================
    // Management
    // ========================================================================

    /// Add a brand. Names are trimmed; duplicates are allowed.
    pub fn add_brand(&mut self, name: &str) -> Result<BrandId, CatalogError> {
        let name = validated_name(name, "Brand")?;
        if self.brand_by_name(&name).is_some() {
            log::debug!("Adding second brand named {:?}", name);
        }
        let brand = Brand::new(name);
        let id = brand.id;
        log::info!("Added brand {:?}", brand.name);
        self.brands.push(brand);
        Ok(id)
    }

    /// Add a material type under an existing brand.
    pub fn add_material_type(
        &mut self,
        brand: BrandId,
        name: &str,
        properties: Option<&str>,
    ) -> Result<MaterialTypeId, CatalogError> {
        let name = validated_name(name, "Material type")?;
        if self.brand(brand).is_none() {
            return Err(CatalogError::BrandNotFound(brand));
        }
        let mut material_type = MaterialType::new(brand, name);
        if let Some(props) = properties.map(str::trim).filter(|p| !p.is_empty()) {
            material_type = material_type.with_properties(props);
        }
        let id = material_type.id;
        self.material_types.push(material_type);
        Ok(id)
    }

    /// Add a fully built color entry under its material type.
    pub fn add_color(&mut self, mut color: FilamentColor) -> Result<ColorId, CatalogError> {
        color.name = validated_name(&color.name, "Color")?;
        if self.material_type(color.material_type_id).is_none() {
            return Err(CatalogError::MaterialTypeNotFound(color.material_type_id));
        }
        let id = color.id;
        self.colors.push(color);
        Ok(id)
    }

    /// Delete a brand with all of its material types and their colors.
    ///
    /// Returns `false` if the brand did not exist.
    pub fn delete_brand(&mut self, id: BrandId) -> bool {
        let Some(index) = self.brands.iter().position(|b| b.id == id) else {
            log::debug!("delete_brand: unknown brand {}", id);
            return false;
        };

        let doomed: Vec<MaterialTypeId> = self
            .material_types
            .iter()
            .filter(|m| m.brand_id == id)
            .map(|m| m.id)
            .collect();
        let colors_before = self.colors.len();
        self.colors
            .retain(|c| !doomed.contains(&c.material_type_id));
        self.material_types.retain(|m| m.brand_id != id);
        let brand = self.brands.remove(index);

        log::info!(
            "Deleted brand {:?} with {} material types and {} colors",
            brand.name,
            doomed.len(),
            colors_before - self.colors.len()
        );
        true
    }

    /// Delete a material type and its colors.
    pub fn delete_material_type(&mut self, id: MaterialTypeId) -> bool {
        let Some(index) = self.material_types.iter().position(|m| m.id == id) else {
            log::debug!("delete_material_type: unknown material type {}", id);
            return false;
        };
        self.colors.retain(|c| c.material_type_id != id);
        self.material_types.remove(index);
        true
    }

    /// Delete a single color entry.
    pub fn delete_color(&mut self, id: ColorId) -> bool {
        let before = self.colors.len();
        self.colors.retain(|c| c.id != id);
        before != self.colors.len()
    }
}

fn compare_paths(a: &ColorPath<'_>, b: &ColorPath<'_>) -> Ordering {
    a.brand
        .name
        .cmp(&b.brand.name)
        .then_with(|| a.material_type.name.cmp(&b.material_type.name))
        .then_with(|| a.color.name.cmp(&b.color.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use pretty_assertions::assert_eq;

    /// Small catalog: two brands, three material types, five colors.
    fn sample_catalog() -> (CatalogRepository, BrandId, MaterialTypeId) {
        let mut catalog = CatalogRepository::new();
        let tinzhu = catalog.add_brand("拓竹 Tinzhu").unwrap();
        let pla = catalog
            .add_material_type(tinzhu, "PLA Basic", Some("190-230°C"))
            .unwrap();
        let petg = catalog.add_material_type(tinzhu, "PETG HF", None).unwrap();
        catalog
            .add_color(FilamentColor::new(pla, "红色", ColorValue::rgb(1.0, 0.0, 0.0)))
            .unwrap();
        catalog
            .add_color(FilamentColor::new(pla, "Black", ColorValue::BLACK))
            .unwrap();
        catalog
            .add_color(FilamentColor::new(petg, "Blue", ColorValue::rgb(0.0, 0.0, 1.0)))
            .unwrap();

        let acme = catalog.add_brand("Acme").unwrap();
        let silk = catalog.add_material_type(acme, "Silk PLA", None).unwrap();
        catalog
            .add_color(FilamentColor::new(silk, "Gold", ColorValue::rgb(1.0, 0.8, 0.0)))
            .unwrap();
        catalog
            .add_color(FilamentColor::new(silk, "Black Pearl", ColorValue::BLACK))
            .unwrap();

        (catalog, tinzhu, pla)
    }

    fn names(colors: &[&FilamentColor]) -> Vec<String> {
        colors.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let (catalog, _, _) = sample_catalog();
        assert!(catalog.search("").is_empty());
        assert!(catalog.search("   ").is_empty());
        assert!(CatalogRepository::new().search("").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (catalog, _, _) = sample_catalog();
        let lower = catalog.search("pla");
        let upper = catalog.search("PLA");
        assert!(lower.iter().any(|c| c.name == "红色"));
        assert!(upper.iter().any(|c| c.name == "红色"));
        assert_eq!(names(&lower), names(&upper));
    }

    #[test]
    fn test_search_matches_all_levels_and_sorts() {
        let (catalog, _, _) = sample_catalog();

        // Brand level
        assert_eq!(names(&catalog.search("tinzhu")), vec!["Blue", "Black", "红色"]);
        // Material level
        assert_eq!(names(&catalog.search("silk")), vec!["Black Pearl", "Gold"]);
        // Color level, spanning brands: Acme sorts before 拓竹
        assert_eq!(names(&catalog.search("black")), vec!["Black Pearl", "Black"]);
        // Non-ASCII query
        assert_eq!(names(&catalog.search("红")), vec!["红色"]);
        assert!(catalog.search("nylon").is_empty());
    }

    #[test]
    fn test_search_skips_orphaned_colors() {
        let (catalog, _, _) = sample_catalog();
        let mut snapshot = catalog.to_snapshot();
        snapshot.colors.push(FilamentColor::new(
            MaterialTypeId::new(),
            "Orphan Black",
            ColorValue::BLACK,
        ));
        let catalog = CatalogRepository::from_snapshot(snapshot);

        assert_eq!(catalog.color_count(), 6);
        assert!(catalog.search("orphan").is_empty());
        assert_eq!(names(&catalog.search("black")), vec!["Black Pearl", "Black"]);
    }

    #[test]
    fn test_fetch_sorted_by_name() {
        let (catalog, tinzhu, pla) = sample_catalog();
        let brands: Vec<&str> = catalog.fetch_brands().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(brands, vec!["Acme", "拓竹 Tinzhu"]);

        let types: Vec<&str> = catalog
            .fetch_material_types(tinzhu)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(types, vec!["PETG HF", "PLA Basic"]);

        assert_eq!(names(&catalog.fetch_colors(pla)), vec!["Black", "红色"]);
        assert!(catalog.fetch_material_types(BrandId::new()).is_empty());
        assert!(catalog.fetch_colors(MaterialTypeId::new()).is_empty());
    }

    #[test]
    fn test_delete_brand_cascades() {
        let (mut catalog, tinzhu, pla) = sample_catalog();
        let petg = catalog.fetch_material_types(tinzhu)[0].id;

        assert!(catalog.delete_brand(tinzhu));
        assert_eq!(catalog.brand_count(), 1);
        assert_eq!(catalog.material_type_count(), 1);
        assert_eq!(catalog.color_count(), 2);
        assert!(catalog.fetch_material_types(tinzhu).is_empty());
        assert!(catalog.fetch_colors(pla).is_empty());
        assert!(catalog.fetch_colors(petg).is_empty());
        assert!(catalog.search("tinzhu").is_empty());

        // Second delete is a no-op
        assert!(!catalog.delete_brand(tinzhu));
        assert_eq!(catalog.brand_count(), 1);
    }

    #[test]
    fn test_delete_material_type_cascades() {
        let (mut catalog, tinzhu, pla) = sample_catalog();
        assert!(catalog.delete_material_type(pla));
        assert!(catalog.fetch_colors(pla).is_empty());
        assert_eq!(catalog.fetch_material_types(tinzhu).len(), 1);
        assert_eq!(catalog.color_count(), 3);
        assert!(!catalog.delete_material_type(pla));
    }

    #[test]
    fn test_delete_color() {
        let (mut catalog, _, pla) = sample_catalog();
        let red = catalog.fetch_colors(pla)[1].id;
        assert!(catalog.delete_color(red));
        assert!(catalog.color(red).is_none());
        assert!(!catalog.delete_color(red));
    }

    #[test]
    fn test_seed_if_empty_is_idempotent() {
        let mut catalog = CatalogRepository::new();
        assert!(catalog.seed_if_empty());
        let brands = catalog.brand_count();
        let colors = catalog.color_count();
        assert!(brands > 0);

        assert!(!catalog.seed_if_empty());
        assert_eq!(catalog.brand_count(), brands);
        assert_eq!(catalog.color_count(), colors);
    }

    #[test]
    fn test_seed_skipped_when_user_brand_exists() {
        let mut catalog = CatalogRepository::new();
        catalog.add_brand("Homebrew").unwrap();
        assert!(!catalog.seed_if_empty());
        assert_eq!(catalog.brand_count(), 1);
    }

    #[test]
    fn test_add_validation() {
        let mut catalog = CatalogRepository::new();
        assert_eq!(
            catalog.add_brand("  "),
            Err(CatalogError::EmptyName { kind: "Brand" })
        );
        let missing = BrandId::new();
        assert_eq!(
            catalog.add_material_type(missing, "PLA", None),
            Err(CatalogError::BrandNotFound(missing))
        );

        let id = catalog.add_brand("  Acme ").unwrap();
        assert_eq!(catalog.brand(id).unwrap().name, "Acme");

        let orphan = FilamentColor::new(MaterialTypeId::new(), "Red", ColorValue::BLACK);
        let orphan_parent = orphan.material_type_id;
        assert_eq!(
            catalog.add_color(orphan),
            Err(CatalogError::MaterialTypeNotFound(orphan_parent))
        );
        assert_eq!(catalog.color_count(), 0);
    }

    #[test]
    fn test_duplicate_brand_names_allowed() {
        let mut catalog = CatalogRepository::new();
        let first = catalog.add_brand("Acme").unwrap();
        let second = catalog.add_brand("Acme").unwrap();
        assert_ne!(first, second);
        assert_eq!(catalog.brand_count(), 2);
        assert_eq!(catalog.brand_by_name("Acme").unwrap().id, first);
        assert!(catalog.brand_by_name("acme").is_none());
    }

    #[test]
    fn test_variants_share_base_name() {
        let mut catalog = CatalogRepository::new();
        let brand = catalog.add_brand("Acme").unwrap();
        let pla = catalog.add_material_type(brand, "PLA", None).unwrap();
        let with = catalog
            .add_color(FilamentColor::new(pla, "Jade White (with spool)", ColorValue::WHITE))
            .unwrap();
        catalog
            .add_color(
                FilamentColor::new(pla, "Jade White (without spool)", ColorValue::WHITE)
                    .with_spool(false),
            )
            .unwrap();
        catalog
            .add_color(FilamentColor::new(pla, "Jade Green", ColorValue::BLACK))
            .unwrap();

        let variants = catalog.variants_of(with);
        assert_eq!(variants.len(), 2);
        assert!(variants.iter().any(|c| !c.has_spool));
        assert!(catalog.variants_of(ColorId::new()).is_empty());
    }

    #[test]
    fn test_color_path() {
        let (catalog, _, pla) = sample_catalog();
        let red = catalog.fetch_colors(pla)[1].id;
        let path = catalog.color_path(red).unwrap();
        assert_eq!(path.brand.name, "拓竹 Tinzhu");
        assert_eq!(path.material_type.name, "PLA Basic");
        assert_eq!(path.material_type.properties.as_deref(), Some("190-230°C"));
        assert!(catalog.color_path(ColorId::new()).is_none());
    }

    #[test]
    fn test_snapshot_round_trip_keeps_tables() {
        let (catalog, _, _) = sample_catalog();
        let json = serde_json::to_string(&catalog.to_snapshot()).unwrap();
        let restored = CatalogRepository::from_snapshot(
            serde_json::from_str::<CatalogSnapshot>(&json).unwrap(),
        );
        assert_eq!(restored.brand_count(), 2);
        assert_eq!(restored.material_type_count(), 3);
        assert_eq!(names(&restored.search("pla")), names(&catalog.search("pla")));
    }
}
