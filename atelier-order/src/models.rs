use atelier_catalog::variant::Color;
use atelier_shared::pii::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the lifecycle. Transitions are unidirectional; Cancelled
/// is terminal and only reachable from Pending or Processing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<Masked<String>>,
}

/// Color details frozen into an order item, so later catalog edits cannot
/// rewrite what the customer bought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSnapshot {
    pub name: String,
    pub hex: String,
}

impl From<&Color> for ColorSnapshot {
    fn from(color: &Color) -> Self {
        Self {
            name: color.name.clone(),
            hex: color.hex.clone(),
        }
    }
}

/// Immutable snapshot of one purchased line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    pub size: Option<String>,
    pub image: Option<String>,
    pub variant_sku: Option<String>,
    pub size_sku: Option<String>,
    pub color: Option<ColorSnapshot>,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// The single source of truth for a customer's purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_email: Masked<String>,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingAddress,
    pub payment_method: String,
    pub items_price_cents: i64,
    pub shipping_price_cents: i64,
    pub tax_price_cents: i64,
    pub total_price_cents: i64,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        customer_id: Uuid,
        customer_email: Masked<String>,
        shipping: ShippingAddress,
        payment_method: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            customer_email,
            items: Vec::new(),
            shipping,
            payment_method,
            items_price_cents: 0,
            shipping_price_cents: 0,
            tax_price_cents: 0,
            total_price_cents: 0,
            status: OrderStatus::Pending,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_item(&mut self, item: OrderItem) {
        self.items_price_cents += item.line_total_cents();
        self.items.push(item);
        self.updated_at = Utc::now();
    }

    /// Finalize the computed price fields once all items are in.
    pub fn apply_charges(&mut self, shipping_cents: i64, tax_cents: i64) {
        self.shipping_price_cents = shipping_cents;
        self.tax_price_cents = tax_cents;
        self.total_price_cents = self.items_price_cents + shipping_cents + tax_cents;
        self.updated_at = Utc::now();
    }

    pub fn update_status(&mut self, new_status: OrderStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    pub fn mark_paid(&mut self) {
        self.is_paid = true;
        self.paid_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn mark_delivered(&mut self) {
        self.is_delivered = true;
        self.delivered_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping() -> ShippingAddress {
        ShippingAddress {
            address: "1 Rue de Rivoli".to_string(),
            city: "Paris".to_string(),
            postal_code: "75001".to_string(),
            country: "FR".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_totals_accumulate_from_items() {
        let mut order = Order::new(
            Uuid::new_v4(),
            Masked::new("c@example.com".to_string()),
            shipping(),
            "card".to_string(),
        );
        order.add_item(OrderItem {
            product_id: Uuid::new_v4(),
            name: "Classic Cotton T-Shirt".to_string(),
            unit_price_cents: 2999,
            quantity: 2,
            size: Some("M".to_string()),
            image: None,
            variant_sku: Some("CLASSICC-NVY".to_string()),
            size_sku: Some("CLASSICC-NVY-M".to_string()),
            color: None,
        });
        order.apply_charges(500, 900);

        assert_eq!(order.items_price_cents, 5998);
        assert_eq!(order.total_price_cents, 5998 + 500 + 900);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.is_paid);
    }

    #[test]
    fn test_mark_delivered_sets_timestamp() {
        let mut order = Order::new(
            Uuid::new_v4(),
            Masked::new("c@example.com".to_string()),
            shipping(),
            "card".to_string(),
        );
        order.mark_delivered();
        assert!(order.is_delivered);
        assert!(order.delivered_at.is_some());
    }
}
