//! Spooldex - filament spool inventory
//!
//! A catalog of known filaments (brand, material type, color) and a personal
//! inventory of owned spools, with aggregate statistics and JSON storage.

pub mod catalog;
pub mod color;
pub mod config;
pub mod constants;
pub mod inventory;
pub mod logging;
pub mod model;
pub mod seed;
pub mod session;
pub mod stats;
pub mod storage;

pub use catalog::{CatalogError, CatalogRepository, ColorPath};
pub use color::{ColorValue, PlatformColor};
pub use inventory::{InventoryError, InventoryStore};
pub use session::{SeedReport, Session, SessionOptions};
pub use stats::InventorySummary;
