//! Stored forms of the catalog and the inventory.
//!
//! # Versioning
//!
//! Snapshots carry a semantic version (MAJOR.MINOR.PATCH). Files with a
//! newer major version are refused; any other mismatch is read with a
//! warning, relying on serde defaults for fields added since.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StorageError;
use crate::model::{Brand, FilamentColor, InventoryItem, MaterialType};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Major version number for compatibility checking.
pub const SNAPSHOT_VERSION_MAJOR: u32 = 1;

/// Parse a version string into (major, minor, patch) components.
///
/// Returns None if the version string is invalid.
pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

/// Refuse versions from the future, warn on anything else unusual.
fn check_version(kind: &str, version: &str) -> Result<(), StorageError> {
    match parse_version(version) {
        Some((major, _, _)) if major > SNAPSHOT_VERSION_MAJOR => {
            Err(StorageError::VersionTooNew {
                found: version.to_string(),
                supported: SNAPSHOT_VERSION.to_string(),
            })
        }
        Some(_) if version == SNAPSHOT_VERSION => Ok(()),
        _ => {
            log::warn!(
                "{} snapshot version mismatch: expected {}, got {}",
                kind,
                SNAPSHOT_VERSION,
                version
            );
            Ok(())
        }
    }
}

/// The catalog as three flat tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub version: String,
    #[serde(default)]
    pub brands: Vec<Brand>,
    #[serde(default)]
    pub material_types: Vec<MaterialType>,
    #[serde(default)]
    pub colors: Vec<FilamentColor>,
}

impl CatalogSnapshot {
    pub fn new(
        brands: Vec<Brand>,
        material_types: Vec<MaterialType>,
        colors: Vec<FilamentColor>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            brands,
            material_types,
            colors,
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let snapshot: Self = serde_json::from_str(json)?;
        check_version("Catalog", &snapshot.version)?;
        Ok(snapshot)
    }
}

/// The inventory item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub version: String,
    /// Time the snapshot was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<InventoryItem>,
}

impl InventorySnapshot {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Some(Utc::now()),
            items,
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let snapshot: Self = serde_json::from_str(json)?;
        check_version("Inventory", &snapshot.version)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::model::Spool;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.2.3"), Some((1, 2, 3)));
        assert_eq!(parse_version("1.2"), None);
        assert_eq!(parse_version("1.2.3.4"), None);
        assert_eq!(parse_version("a.b.c"), None);
    }

    #[test]
    fn test_newer_major_is_rejected() {
        let json = r#"{"version": "2.0.0", "items": []}"#;
        assert!(matches!(
            InventorySnapshot::from_json(json),
            Err(StorageError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_older_or_odd_versions_still_load() {
        let json = r#"{"version": "0.9.0", "brands": []}"#;
        let snapshot = CatalogSnapshot::from_json(json).unwrap();
        assert!(snapshot.brands.is_empty());
        assert!(snapshot.colors.is_empty());

        let json = r#"{"version": "dev", "items": []}"#;
        assert!(InventorySnapshot::from_json(json).is_ok());
    }

    #[test]
    fn test_inventory_json_mirrors_field_names() {
        let item = InventoryItem::new("Acme", "PLA", "Red")
            .with_color(ColorValue::rgb(1.0, 0.0, 0.0))
            .with_spools(vec![Spool::new(40.0, "open")]);
        let json = InventorySnapshot::new(vec![item]).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let stored = &value["items"][0];
        assert_eq!(stored["brand"], "Acme");
        assert_eq!(stored["colorName"], "Red");
        assert_eq!(stored["weightGrams"], 1000.0);
        assert_eq!(stored["colorValue"]["red"], 1.0);
        assert_eq!(stored["spools"][0]["remainingPercentage"], 40.0);
        assert_eq!(stored["spools"][0]["notes"], "open");
        assert!(stored["dateAdded"].is_string());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            CatalogSnapshot::from_json("{ not json"),
            Err(StorageError::Json(_))
        ));
    }
}
