use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;

/// Inventory snapshot line for one product, owned by the external
/// inventory store. A product with no inventory line is treated as
/// available unless its catalog entry says otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: ProductId,
    /// May go negative when sales are recorded ahead of deliveries.
    pub current_stock: f64,
    pub reorder_point: f64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Find the inventory line for a product in a snapshot slice.
pub fn stock_line<'a>(inventory: &'a [InventoryItem], product_id: &ProductId) -> Option<&'a InventoryItem> {
    inventory.iter().find(|item| &item.product_id == product_id)
}
