use crate::pii::Masked;
use uuid::Uuid;

/// Emitted after a stock mutation lands on a (variant SKU, size) record or a
/// legacy flat counter. `delta` is negative for decrements.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct StockAdjustedEvent {
    pub product_id: Uuid,
    pub variant_sku: Option<String>,
    pub size: Option<String>,
    pub delta: i64,
    pub remaining: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusChangedEvent {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub recipient: Masked<String>,
    pub new_status: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderCancelledEvent {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub recipient: Masked<String>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReviewSavedEvent {
    pub review_id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReviewRemovedEvent {
    pub review_id: Uuid,
    pub product_id: Uuid,
    pub timestamp: i64,
}
