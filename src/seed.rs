//! Built-in starter data.
//!
//! The starter catalog is inserted the first time a catalog is found empty.
//! The sample inventory is an optional first-run demo.

use crate::color::ColorValue;
use crate::model::{
    Brand, Diameter, FilamentColor, GradientKind, InventoryItem, MaterialType, Spool,
};
use crate::storage::CatalogSnapshot;

/// One color of the starter table: name, hex, product code.
type ColorRow = (&'static str, &'static str, Option<&'static str>);

/// Accumulates starter tables with freshly generated ids.
struct StarterBuilder {
    brands: Vec<Brand>,
    material_types: Vec<MaterialType>,
    colors: Vec<FilamentColor>,
}

impl StarterBuilder {
    fn brand(&mut self, name: &str) -> usize {
        self.brands.push(Brand::new(name));
        self.brands.len() - 1
    }

    /// Add a material type under brand `brand` with plain solid colors.
    fn material(
        &mut self,
        brand: usize,
        name: &str,
        properties: &str,
        colors: &[ColorRow],
    ) -> usize {
        let material = MaterialType::new(self.brands[brand].id, name).with_properties(properties);
        let material_id = material.id;
        self.material_types.push(material);
        for &(color_name, hex, code) in colors {
            let color = ColorValue::from_hex(hex).unwrap_or_default();
            let mut entry = FilamentColor::new(material_id, color_name, color);
            if let Some(code) = code {
                entry = entry.with_product_code(code);
            }
            self.colors.push(entry);
        }
        self.material_types.len() - 1
    }

    /// Add a prebuilt color under material type `material`.
    fn special(&mut self, material: usize, build: impl FnOnce(FilamentColor) -> FilamentColor) {
        let base = FilamentColor::new(
            self.material_types[material].id,
            String::new(),
            ColorValue::default(),
        );
        self.colors.push(build(base));
    }
}

fn named(mut color: FilamentColor, name: &str, hex: &str) -> FilamentColor {
    color.name = name.to_string();
    color.color = ColorValue::from_hex(hex).unwrap_or_default();
    color
}

/// The starter library: a few common brands, material lines and colors.
pub fn starter_catalog() -> CatalogSnapshot {
    let mut b = StarterBuilder {
        brands: Vec::new(),
        material_types: Vec::new(),
        colors: Vec::new(),
    };

    let tinzhu = b.brand("拓竹 Tinzhu");
    let pla_basic = b.material(
        tinzhu,
        "PLA Basic",
        "Nozzle 190-230°C, bed 35-45°C",
        &[
            ("红色", "#C12E1F", Some("10200")),
            ("黑色", "#000000", Some("10101")),
            ("Jade White (with spool)", "#FFFFFF", Some("10100")),
            ("Cyan", "#0086D6", Some("10603")),
        ],
    );
    b.special(pla_basic, |c| {
        named(c, "Jade White (without spool)", "#FFFFFF")
            .with_product_code("10100R")
            .with_spool(false)
    });

    let silk = b.material(tinzhu, "PLA Silk+", "Nozzle 210-230°C", &[]);
    b.special(silk, |c| named(c, "金色", "#E4BD68").metallic());
    b.special(silk, |c| {
        named(c, "Gold-Silver Dual", "#E4BD68")
            .metallic()
            .with_gradient(GradientKind::Horizontal, vec![ColorValue::from_rgb8(0xC0, 0xC0, 0xC0)])
    });
    b.material(
        tinzhu,
        "PETG HF",
        "Nozzle 230-260°C, bed 70°C",
        &[("灰色", "#8E9089", Some("33102")), ("Orange", "#F75403", Some("33300"))],
    );
    let translucent = b.material(tinzhu, "PETG Translucent", "Nozzle 230-260°C", &[]);
    b.special(translucent, |c| {
        named(c, "透明", "#FFFFFF80").transparent()
    });

    let esun = b.brand("eSun");
    b.material(
        esun,
        "PLA+",
        "Nozzle 205-225°C, bed 60-80°C",
        &[
            ("Black", "#1A1A1A", None),
            ("White", "#F5F5F5", None),
            ("Fire Engine Red", "#B0171F", None),
            ("Grass Green", "#3F9B0B", None),
        ],
    );
    b.material(
        esun,
        "PETG",
        "Nozzle 230-250°C, bed 75-85°C",
        &[("Solid Blue", "#1F4E9E", None), ("Solid Yellow", "#F2C500", None)],
    );

    let polymaker = b.brand("Polymaker");
    b.material(
        polymaker,
        "PolyTerra PLA",
        "Nozzle 190-230°C, bed 25-60°C",
        &[
            ("Charcoal Black", "#2B2B2B", Some("PA04001")),
            ("Cotton White", "#EDEAE4", Some("PA04002")),
            ("Forest Green", "#2F5233", Some("PA04006")),
        ],
    );
    let polylite_silk = b.material(polymaker, "PolyLite Silk PLA", "Nozzle 190-230°C", &[]);
    b.special(polylite_silk, |c| {
        named(c, "Rainbow", "#FF0000").with_gradient(GradientKind::Rainbow, Vec::new())
    });
    b.special(polylite_silk, |c| named(c, "Silver", "#C0C0C0").metallic());

    let sunlu = b.brand("Sunlu");
    b.material(
        sunlu,
        "PLA Meta",
        "Nozzle 200-230°C, bed 50-65°C",
        &[("Purple", "#6A2C91", None), ("Orange", "#FF7F00", None)],
    );

    CatalogSnapshot::new(b.brands, b.material_types, b.colors)
}

/// A handful of demo items shown on first launch.
pub fn sample_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("拓竹 Tinzhu", "PLA Basic", "红色")
            .with_color(ColorValue::from_rgb8(0xC1, 0x2E, 0x1F))
            .with_spools(vec![Spool::new(100.0, ""), Spool::new(45.0, "on printer")]),
        InventoryItem::new("eSun", "PETG", "Solid Blue")
            .with_diameter(Diameter::D175)
            .with_spools(vec![Spool::new(80.0, "")]),
        InventoryItem::new("Polymaker", "PolyTerra PLA", "Charcoal Black")
            .with_weight(750.0)
            .with_spools(vec![Spool::new(10.0, "nearly out"), Spool::new(0.0, "")])
            .with_notes("reorder"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_catalog_links_resolve() {
        let starter = starter_catalog();
        assert!(!starter.brands.is_empty());
        for material in &starter.material_types {
            assert!(starter.brands.iter().any(|b| b.id == material.brand_id));
        }
        for color in &starter.colors {
            assert!(!color.name.is_empty());
            assert!(
                starter
                    .material_types
                    .iter()
                    .any(|m| m.id == color.material_type_id)
            );
        }
    }

    #[test]
    fn test_starter_catalog_is_deterministic() {
        let names = |s: &CatalogSnapshot| -> Vec<String> {
            s.colors.iter().map(|c| c.name.clone()).collect()
        };
        let first = starter_catalog();
        let second = starter_catalog();
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.brands.len(), second.brands.len());
    }

    #[test]
    fn test_starter_catalog_has_spool_variants() {
        let starter = starter_catalog();
        let jade: Vec<&FilamentColor> = starter
            .colors
            .iter()
            .filter(|c| c.base_name() == "Jade White")
            .collect();
        assert_eq!(jade.len(), 2);
        assert!(jade.iter().any(|c| c.has_spool));
        assert!(jade.iter().any(|c| !c.has_spool));
    }

    #[test]
    fn test_sample_inventory_items_have_spools() {
        let items = sample_inventory();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| !i.spools.is_empty()));
    }
}
