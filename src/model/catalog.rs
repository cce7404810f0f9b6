//! Catalog data model: Brand -> MaterialType -> FilamentColor.
//!
//! Children refer to their parent by id. The repository owns the flat
//! tables and resolves those links; see [`crate::catalog`].

use serde::{Deserialize, Serialize};

use super::{BrandId, ColorId, MaterialTypeId};
use crate::color::{ColorValue, rainbow_stops};

/// Suffixes marking the reel / reel-less variants of one catalog color.
pub const SPOOL_SUFFIXES: &[&str] = &[
    "(with spool)",
    "(without spool)",
    "（带料盘）",
    "（不带料盘）",
    "(带料盘)",
    "(不带料盘)",
];

/// Number of stops generated for a rainbow gradient without explicit colors.
pub const RAINBOW_STOP_COUNT: usize = 6;

/// A filament manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

impl Brand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BrandId::new(),
            name: name.into(),
        }
    }
}

/// A material line sold by one brand (e.g. "PLA Basic").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialType {
    pub id: MaterialTypeId,
    pub name: String,
    /// Free text such as print temperatures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
    pub brand_id: BrandId,
}

impl MaterialType {
    pub fn new(brand_id: BrandId, name: impl Into<String>) -> Self {
        Self {
            id: MaterialTypeId::new(),
            name: name.into(),
            properties: None,
            brand_id,
        }
    }

    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }
}

/// Visual blend style of a multi-color catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradientKind {
    #[default]
    None,
    Horizontal,
    Vertical,
    Diagonal,
    Radial,
    MultiColor,
    Rainbow,
}

impl GradientKind {
    /// Get the display name for this gradient kind.
    pub fn name(&self) -> &'static str {
        match self {
            GradientKind::None => "Solid",
            GradientKind::Horizontal => "Horizontal",
            GradientKind::Vertical => "Vertical",
            GradientKind::Diagonal => "Diagonal",
            GradientKind::Radial => "Radial",
            GradientKind::MultiColor => "Multi-color",
            GradientKind::Rainbow => "Rainbow",
        }
    }
}

/// One color entry of a material type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawFilamentColor")]
pub struct FilamentColor {
    pub id: ColorId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    pub color: ColorValue,
    #[serde(default)]
    pub is_transparent: bool,
    #[serde(default)]
    pub is_metallic: bool,
    /// Sold wound on a reel, as opposed to a refill.
    #[serde(default = "default_has_spool")]
    pub has_spool: bool,
    #[serde(default)]
    pub gradient_kind: GradientKind,
    /// Extra gradient stops; only kept when `gradient_kind` is not `None`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_colors: Vec<ColorValue>,
    pub material_type_id: MaterialTypeId,
}

fn default_has_spool() -> bool {
    true
}

/// Stored form of [`FilamentColor`]; stops without a gradient kind are
/// dropped on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFilamentColor {
    id: ColorId,
    name: String,
    #[serde(default)]
    product_code: Option<String>,
    color: ColorValue,
    #[serde(default)]
    is_transparent: bool,
    #[serde(default)]
    is_metallic: bool,
    #[serde(default = "default_has_spool")]
    has_spool: bool,
    #[serde(default)]
    gradient_kind: GradientKind,
    #[serde(default)]
    additional_colors: Vec<ColorValue>,
    material_type_id: MaterialTypeId,
}

impl From<RawFilamentColor> for FilamentColor {
    fn from(raw: RawFilamentColor) -> Self {
        let additional_colors = if raw.gradient_kind == GradientKind::None {
            Vec::new()
        } else {
            raw.additional_colors
        };
        Self {
            id: raw.id,
            name: raw.name,
            product_code: raw.product_code,
            color: raw.color,
            is_transparent: raw.is_transparent,
            is_metallic: raw.is_metallic,
            has_spool: raw.has_spool,
            gradient_kind: raw.gradient_kind,
            additional_colors,
            material_type_id: raw.material_type_id,
        }
    }
}

impl FilamentColor {
    pub fn new(material_type_id: MaterialTypeId, name: impl Into<String>, color: ColorValue) -> Self {
        Self {
            id: ColorId::new(),
            name: name.into(),
            product_code: None,
            color,
            is_transparent: false,
            is_metallic: false,
            has_spool: true,
            gradient_kind: GradientKind::None,
            additional_colors: Vec::new(),
            material_type_id,
        }
    }

    pub fn with_product_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    pub fn transparent(mut self) -> Self {
        self.is_transparent = true;
        self
    }

    pub fn metallic(mut self) -> Self {
        self.is_metallic = true;
        self
    }

    pub fn with_spool(mut self, has_spool: bool) -> Self {
        self.has_spool = has_spool;
        self
    }

    /// Set the gradient style and its extra stops.
    ///
    /// Stops are dropped for `GradientKind::None`. A rainbow without
    /// explicit stops gets evenly spaced hues.
    pub fn with_gradient(mut self, kind: GradientKind, stops: Vec<ColorValue>) -> Self {
        self.gradient_kind = kind;
        self.additional_colors = match kind {
            GradientKind::None => Vec::new(),
            GradientKind::Rainbow if stops.is_empty() => rainbow_stops(RAINBOW_STOP_COUNT),
            _ => stops,
        };
        self
    }

    /// Name without any with/without-spool marker.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    pub fn is_gradient(&self) -> bool {
        self.gradient_kind != GradientKind::None && !self.additional_colors.is_empty()
    }

    /// Primary color followed by gradient stops.
    pub fn display_colors(&self) -> Vec<ColorValue> {
        let mut colors = vec![self.color];
        if self.is_gradient() {
            colors.extend(self.additional_colors.iter().copied());
        }
        colors
    }
}

/// Strip a trailing with/without-spool marker from a color name.
pub fn base_name(name: &str) -> &str {
    let trimmed = name.trim_end();
    SPOOL_SUFFIXES
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(*suffix))
        .map(str::trim_end)
        .unwrap_or(trimmed)
}
