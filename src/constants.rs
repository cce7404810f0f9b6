//! Global constants for Spooldex

/// Application name, used for config and data directories
pub const APP_NAME: &str = "spooldex";

/// File name of the stored catalog inside the data directory
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// File name of the stored inventory inside the data directory
pub const INVENTORY_FILE_NAME: &str = "inventory.json";

/// Average remaining percentage below which an item counts as running low
pub const DEFAULT_LOW_STOCK_PERCENTAGE: f64 = 20.0;
