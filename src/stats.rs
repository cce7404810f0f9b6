//! Roll-ups over the inventory.
//!
//! Everything here is a pure function of the item slice it is given;
//! nothing is cached.

use std::collections::HashMap;

use crate::model::InventoryItem;

/// Spool count for one group (brand or material type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub name: String,
    pub spool_count: usize,
}

/// Group by a key, summing spool counts. Largest groups first; ties by name
/// so the order is stable.
fn group_spools<'a>(
    items: &'a [InventoryItem],
    key: impl Fn(&'a InventoryItem) -> &'a str,
) -> Vec<GroupCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(key(item)).or_default() += item.spools.len();
    }
    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(name, spool_count)| GroupCount {
            name: name.to_string(),
            spool_count,
        })
        .collect();
    groups.sort_by(|a, b| {
        b.spool_count
            .cmp(&a.spool_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    groups
}

/// Spools per brand. Brand names are compared exactly, so "Acme" and
/// "acme" are separate groups.
pub fn brand_statistics(items: &[InventoryItem]) -> Vec<GroupCount> {
    group_spools(items, |item| item.brand.as_str())
}

/// Spools per material type name, exact match.
pub fn type_statistics(items: &[InventoryItem]) -> Vec<GroupCount> {
    group_spools(items, |item| item.material_type_name.as_str())
}

pub fn total_spool_count(items: &[InventoryItem]) -> usize {
    items.iter().map(|i| i.spools.len()).sum()
}

/// Spools at 100%.
pub fn full_spool_count(items: &[InventoryItem]) -> usize {
    items.iter().map(InventoryItem::full_spool_count).sum()
}

/// Spools with anything left.
pub fn remaining_spool_count(items: &[InventoryItem]) -> usize {
    items.iter().map(InventoryItem::remaining_spool_count).sum()
}

/// Spools that are neither full nor empty.
pub fn partially_used_spool_count(items: &[InventoryItem]) -> usize {
    remaining_spool_count(items) - full_spool_count(items)
}

pub fn empty_spool_count(items: &[InventoryItem]) -> usize {
    total_spool_count(items) - remaining_spool_count(items)
}

/// Grams of filament left over all items.
pub fn estimated_remaining_weight(items: &[InventoryItem]) -> f64 {
    items
        .iter()
        .map(InventoryItem::estimated_remaining_weight)
        .sum()
}

/// Items whose average remaining percentage is below `threshold`.
///
/// Items without spools average 0 and therefore always qualify.
pub fn low_stock(items: &[InventoryItem], threshold: f64) -> Vec<&InventoryItem> {
    items
        .iter()
        .filter(|i| i.average_remaining_percentage() < threshold)
        .collect()
}

/// All roll-ups at once.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub item_count: usize,
    pub total_spools: usize,
    pub full_spools: usize,
    pub partially_used_spools: usize,
    pub empty_spools: usize,
    pub estimated_remaining_grams: f64,
    pub by_brand: Vec<GroupCount>,
    pub by_type: Vec<GroupCount>,
}

impl InventorySummary {
    pub fn compute(items: &[InventoryItem]) -> Self {
        Self {
            item_count: items.len(),
            total_spools: total_spool_count(items),
            full_spools: full_spool_count(items),
            partially_used_spools: partially_used_spool_count(items),
            empty_spools: empty_spool_count(items),
            estimated_remaining_grams: estimated_remaining_weight(items),
            by_brand: brand_statistics(items),
            by_type: type_statistics(items),
        }
    }
}
