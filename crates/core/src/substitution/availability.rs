//! Out-of-stock resolution.

use crate::domain::inventory::InventoryItem;
use crate::domain::product::Product;

/// Whether a product is effectively unavailable.
///
/// Policy, in order:
/// 1. an explicit `is_available = false` flag wins;
/// 2. the inventory snapshot's stock level takes precedence over the
///    catalog's own stock field;
/// 3. zero or negative stock (over-recorded sales) counts as unavailable;
/// 4. missing stock data defaults to available.
pub fn is_out_of_stock(product: &Product, inventory: Option<&InventoryItem>) -> bool {
    if product.is_available == Some(false) {
        return true;
    }

    let stock = inventory.map(|item| item.current_stock).or(product.current_stock);
    matches!(stock, Some(level) if level <= 0.0)
}
