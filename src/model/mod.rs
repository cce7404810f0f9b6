//! Data models for the filament catalog and the personal inventory.

mod catalog;
mod inventory;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use catalog::{
    Brand, FilamentColor, GradientKind, MaterialType, RAINBOW_STOP_COUNT, SPOOL_SUFFIXES,
    base_name,
};
pub use inventory::{
    DEFAULT_WEIGHT_GRAMS, Diameter, DiameterError, FULL_PERCENTAGE, InventoryItem, Spool, SpoolStatus,
};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a catalog brand.
    BrandId
);
define_id!(
    /// Unique identifier for a catalog material type.
    MaterialTypeId
);
define_id!(
    /// Unique identifier for a catalog color entry.
    ColorId
);
define_id!(
    /// Unique identifier for an inventory item.
    ItemId
);
define_id!(
    /// Unique identifier for a spool within an inventory item.
    SpoolId
);
