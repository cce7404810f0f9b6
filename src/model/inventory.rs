//! Inventory data model: user-owned filament items and their spools.
//!
//! An item copies brand, material and color data from the catalog by value,
//! so later catalog edits never touch existing inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemId, SpoolId};
use crate::color::{ColorValue, color_for_name};

/// Nominal net weight of a new item in grams.
pub const DEFAULT_WEIGHT_GRAMS: f64 = 1000.0;

/// Upper bound of a spool's remaining percentage.
pub const FULL_PERCENTAGE: f64 = 100.0;

/// Filament diameters in common use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Diameter {
    #[default]
    D175,
    D285,
    D300,
}

impl Diameter {
    pub fn millimeters(&self) -> f64 {
        match self {
            Diameter::D175 => 1.75,
            Diameter::D285 => 2.85,
            Diameter::D300 => 3.0,
        }
    }

    /// Get all supported diameters.
    pub fn all() -> &'static [Diameter] {
        &[Diameter::D175, Diameter::D285, Diameter::D300]
    }
}

impl std::fmt::Display for Diameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} mm", self.millimeters())
    }
}

/// Rejected diameter value.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Unsupported filament diameter: {0} mm")]
pub struct DiameterError(pub f64);

impl TryFrom<f64> for Diameter {
    type Error = DiameterError;

    fn try_from(mm: f64) -> Result<Self, Self::Error> {
        Diameter::all()
            .iter()
            .copied()
            .find(|d| (d.millimeters() - mm).abs() < 0.005)
            .ok_or(DiameterError(mm))
    }
}

impl From<Diameter> for f64 {
    fn from(d: Diameter) -> Self {
        d.millimeters()
    }
}

/// Fill state of a single spool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoolStatus {
    Full,
    Partial,
    Empty,
}

/// One physical reel of filament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spool {
    pub id: SpoolId,
    /// Remaining filament in percent, always within `0.0..=100.0`.
    #[serde(deserialize_with = "deserialize_percentage")]
    remaining_percentage: f64,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

/// Clamp a percentage into `0.0..=100.0`; NaN counts as empty.
fn clamp_percentage(pct: f64) -> f64 {
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, FULL_PERCENTAGE)
    }
}

fn deserialize_percentage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_percentage)
}

impl Spool {
    pub fn new(remaining_percentage: f64, notes: impl Into<String>) -> Self {
        Self {
            id: SpoolId::new(),
            remaining_percentage: clamp_percentage(remaining_percentage),
            date_added: Utc::now(),
            notes: notes.into(),
        }
    }

    /// A new, unused spool.
    pub fn full() -> Self {
        Self::new(FULL_PERCENTAGE, "")
    }

    pub fn remaining_percentage(&self) -> f64 {
        self.remaining_percentage
    }

    /// Store a new percentage, clamped into range.
    pub fn set_remaining_percentage(&mut self, pct: f64) {
        self.remaining_percentage = clamp_percentage(pct);
    }

    pub fn status(&self) -> SpoolStatus {
        if self.remaining_percentage >= FULL_PERCENTAGE {
            SpoolStatus::Full
        } else if self.remaining_percentage > 0.0 {
            SpoolStatus::Partial
        } else {
            SpoolStatus::Empty
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining_percentage > 0.0
    }

    pub fn is_full(&self) -> bool {
        self.remaining_percentage >= FULL_PERCENTAGE
    }
}

/// A filament product the user owns, with one entry per physical spool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    /// Free-form; may or may not match a catalog brand name.
    pub brand: String,
    pub material_type_name: String,
    pub color_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_value: Option<ColorValue>,
    #[serde(default = "default_weight", deserialize_with = "deserialize_weight")]
    pub weight_grams: f64,
    #[serde(default)]
    pub diameter_mm: Diameter,
    #[serde(default)]
    pub spools: Vec<Spool>,
    #[serde(default)]
    pub notes: String,
    date_added: DateTime<Utc>,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT_GRAMS
}

/// Stored weights must be positive grams; anything else loads as the default.
fn deserialize_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let grams = f64::deserialize(deserializer)?;
    if grams.is_finite() && grams > 0.0 {
        Ok(grams)
    } else {
        log::warn!(
            "Stored weight {} g is invalid, using {} g",
            grams,
            DEFAULT_WEIGHT_GRAMS
        );
        Ok(DEFAULT_WEIGHT_GRAMS)
    }
}

impl InventoryItem {
    /// Create an item with a single full spool and the default weight.
    pub fn new(
        brand: impl Into<String>,
        material_type_name: impl Into<String>,
        color_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(),
            brand: brand.into(),
            material_type_name: material_type_name.into(),
            color_name: color_name.into(),
            color_value: None,
            weight_grams: DEFAULT_WEIGHT_GRAMS,
            diameter_mm: Diameter::default(),
            spools: vec![Spool::full()],
            notes: String::new(),
            date_added: Utc::now(),
        }
    }

    pub fn with_color(mut self, color: ColorValue) -> Self {
        self.color_value = Some(color);
        self
    }

    pub fn with_weight(mut self, grams: f64) -> Self {
        self.weight_grams = grams;
        self
    }

    pub fn with_diameter(mut self, diameter: Diameter) -> Self {
        self.diameter_mm = diameter;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Replace the spool list.
    pub fn with_spools(mut self, spools: Vec<Spool>) -> Self {
        self.spools = spools;
        self
    }

    /// Time the item was created. Never changes afterwards.
    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    /// Mean remaining percentage over all spools, 0 when there are none.
    pub fn average_remaining_percentage(&self) -> f64 {
        if self.spools.is_empty() {
            return 0.0;
        }
        let total: f64 = self.spools.iter().map(Spool::remaining_percentage).sum();
        total / self.spools.len() as f64
    }

    /// Spools with anything left on them.
    pub fn remaining_spool_count(&self) -> usize {
        self.spools.iter().filter(|s| s.has_remaining()).count()
    }

    pub fn full_spool_count(&self) -> usize {
        self.spools.iter().filter(|s| s.is_full()).count()
    }

    pub fn empty_spool_count(&self) -> usize {
        self.spools.len() - self.remaining_spool_count()
    }

    /// Grams of filament left, spreading the nominal weight evenly over spools.
    pub fn estimated_remaining_weight(&self) -> f64 {
        if self.spools.is_empty() {
            return 0.0;
        }
        let share = self.weight_grams / self.spools.len() as f64;
        self.spools
            .iter()
            .map(|s| share * s.remaining_percentage() / FULL_PERCENTAGE)
            .sum()
    }

    /// Stored color, or a guess from the color name.
    pub fn resolved_color(&self) -> ColorValue {
        self.color_value
            .unwrap_or_else(|| color_for_name(&self.color_name))
    }

    /// `"Brand Material"` label.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.material_type_name)
    }

    pub fn spool(&self, id: SpoolId) -> Option<&Spool> {
        self.spools.iter().find(|s| s.id == id)
    }

    pub fn spool_mut(&mut self, id: SpoolId) -> Option<&mut Spool> {
        self.spools.iter_mut().find(|s| s.id == id)
    }
}
