use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_catalog::availability::AvailabilityError;
use atelier_catalog::product::{CatalogEntry, Product};
use atelier_catalog::repository::ProductRepository;
use atelier_catalog::stock::{StockDirection, StockLedger};
use atelier_core::events::{DomainEvent, EventDispatcher};
use atelier_core::identity::Actor;
use atelier_shared::models::events::{
    OrderCancelledEvent, OrderStatusChangedEvent, StockAdjustedEvent,
};

use crate::lifecycle;
use crate::models::{ColorSnapshot, Order, OrderItem, OrderStatus, ShippingAddress};
use crate::repository::OrderRepository;

/// Pricing knobs applied at checkout. Loaded from configuration by the store
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRules {
    pub tax_rate: f64,
    pub shipping_fee_cents: i64,
    pub free_shipping_threshold_cents: i64,
}

impl Default for CheckoutRules {
    fn default() -> Self {
        Self {
            tax_rate: 0.15,
            shipping_fee_cents: 1000,
            free_shipping_threshold_cents: 10_000,
        }
    }
}

impl CheckoutRules {
    pub fn shipping_for(&self, items_price_cents: i64) -> i64 {
        if items_price_cents >= self.free_shipping_threshold_cents {
            0
        } else {
            self.shipping_fee_cents
        }
    }

    pub fn tax_for(&self, items_price_cents: i64) -> i64 {
        (items_price_cents as f64 * self.tax_rate).round() as i64
    }
}

/// One cart line at checkout; everything else is snapshotted from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub variant_sku: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
}

/// Drives the order lifecycle: checkout, status transitions, cancellation,
/// payment marking. Stock mutations and notifications hang off these
/// transitions.
pub struct OrderCoordinator {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    dispatcher: Arc<EventDispatcher>,
    rules: CheckoutRules,
}

impl OrderCoordinator {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        dispatcher: Arc<EventDispatcher>,
        rules: CheckoutRules,
    ) -> Self {
        Self {
            products,
            orders,
            dispatcher,
            rules,
        }
    }

    /// Checkout. Phase one validates availability with nothing committed:
    /// every line on its own, then the requested units summed per stock
    /// record, so duplicate lines for one (variant, size) cannot each pass
    /// while jointly exceeding stock. Phase two commits the order document,
    /// then applies one stock decrement per record best-effort: a decrement
    /// that fails after commit is logged and not rolled back (the check
    /// phase bounds the race window to concurrent checkouts).
    pub async fn create_order(
        &self,
        actor: &Actor,
        lines: &[CheckoutItem],
        shipping: ShippingAddress,
        payment_method: String,
    ) -> Result<Order, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::Validation("order has no items".to_string()));
        }

        // Check phase: all-or-nothing, no mutation.
        let mut products: HashMap<Uuid, Product> = HashMap::new();
        let mut snapshots: Vec<OrderItem> = Vec::with_capacity(lines.len());
        let mut requested: Vec<StockAdjustment> = Vec::new();
        for line in lines {
            if line.quantity == 0 {
                return Err(OrderError::Validation(
                    "item quantity must be at least 1".to_string(),
                ));
            }
            if !products.contains_key(&line.product_id) {
                let product = self
                    .products
                    .get_product(line.product_id)
                    .await
                    .map_err(storage_err)?
                    .ok_or_else(|| OrderError::NotFound(line.product_id.to_string()))?;
                products.insert(line.product_id, product);
            }
            let product = products
                .get(&line.product_id)
                .ok_or_else(|| OrderError::NotFound(line.product_id.to_string()))?;

            let availability = product
                .availability(line.variant_sku.as_deref(), line.size.as_deref())
                .map_err(availability_err)?;
            if !availability.available || availability.stock < line.quantity as i32 {
                return Err(OrderError::OutOfStock {
                    product: product.name.clone(),
                    selection: selection_label(line),
                    requested: line.quantity as i32,
                    available: availability.stock,
                });
            }

            snapshots.push(snapshot_item(product, line)?);

            // Legacy products draw from one flat counter whatever the size,
            // so their lines all merge into a single requested total.
            let (variant_sku, size) = match &product.entry {
                CatalogEntry::Legacy(_) => (None, None),
                CatalogEntry::Variants(_) => (line.variant_sku.clone(), line.size.clone()),
            };
            merge_adjustment(
                &mut requested,
                line.product_id,
                variant_sku,
                size,
                line.quantity as i32,
            );
        }

        // The per-line checks above cannot see two lines landing on the same
        // stock record; the summed totals can.
        for adjustment in &requested {
            let product = products
                .get(&adjustment.product_id)
                .ok_or_else(|| OrderError::NotFound(adjustment.product_id.to_string()))?;
            let availability = product
                .availability(
                    adjustment.variant_sku.as_deref(),
                    adjustment.size.as_deref(),
                )
                .map_err(availability_err)?;
            if availability.stock < adjustment.quantity {
                return Err(OrderError::OutOfStock {
                    product: product.name.clone(),
                    selection: adjustment.label(),
                    requested: adjustment.quantity,
                    available: availability.stock,
                });
            }
        }

        // Commit phase.
        let mut order = Order::new(
            actor.user_id,
            actor.email.clone(),
            shipping,
            payment_method,
        );
        for item in snapshots {
            order.add_item(item);
        }
        let shipping_cents = self.rules.shipping_for(order.items_price_cents);
        let tax_cents = self.rules.tax_for(order.items_price_cents);
        order.apply_charges(shipping_cents, tax_cents);
        self.orders.create_order(&order).await.map_err(storage_err)?;

        // Decrement phase: one read-modify-write per stock record, best-effort.
        for adjustment in aggregate_items(&order.items) {
            self.adjust_stock(order.id, &adjustment, StockDirection::Decrement)
                .await;
        }

        self.dispatch_status_change(&order).await;
        Ok(order)
    }

    /// Read path, owner or admin only.
    pub async fn get_order(&self, actor: &Actor, order_id: Uuid) -> Result<Order, OrderError> {
        let order = self.load(order_id).await?;
        if !actor.can_access(order.customer_id) {
            return Err(OrderError::Authorization(
                "only the order owner or an admin may view this order".to_string(),
            ));
        }
        Ok(order)
    }

    /// Admin-driven forward transition. Cancellation goes through
    /// `cancel_order`, which also restores stock.
    pub async fn update_status(
        &self,
        actor: &Actor,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        if !actor.is_admin() {
            return Err(OrderError::Authorization(
                "only admins may change order status".to_string(),
            ));
        }
        if new_status == OrderStatus::Cancelled {
            return Err(OrderError::Validation(
                "use cancel_order to cancel; it also restores stock".to_string(),
            ));
        }

        let mut order = self.load(order_id).await?;
        if !lifecycle::can_transition(order.status, new_status) {
            return Err(OrderError::Transition {
                from: order.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }

        order.update_status(new_status);
        if new_status == OrderStatus::Delivered {
            order.mark_delivered();
        }
        self.orders.save_order(&order).await.map_err(storage_err)?;

        self.dispatch_status_change(&order).await;
        Ok(order)
    }

    /// Owner- or admin-initiated cancellation from Pending/Processing.
    /// Restores stock for every line best-effort before flipping the status.
    pub async fn cancel_order(&self, actor: &Actor, order_id: Uuid) -> Result<Order, OrderError> {
        let mut order = self.load(order_id).await?;
        if !actor.can_access(order.customer_id) {
            return Err(OrderError::Authorization(
                "only the order owner or an admin may cancel this order".to_string(),
            ));
        }
        if !lifecycle::is_cancellable(order.status) {
            return Err(OrderError::Transition {
                from: order.status.as_str().to_string(),
                to: OrderStatus::Cancelled.as_str().to_string(),
            });
        }

        for adjustment in aggregate_items(&order.items) {
            self.adjust_stock(order.id, &adjustment, StockDirection::Increment)
                .await;
        }

        order.update_status(OrderStatus::Cancelled);
        self.orders.save_order(&order).await.map_err(storage_err)?;

        self.dispatcher
            .dispatch(&DomainEvent::OrderCancelled(OrderCancelledEvent {
                order_id: order.id,
                customer_id: order.customer_id,
                recipient: order.customer_email.clone(),
                timestamp: Utc::now().timestamp(),
            }))
            .await;
        Ok(order)
    }

    /// Admin-only payment flag; independent of the status chain.
    pub async fn mark_paid(&self, actor: &Actor, order_id: Uuid) -> Result<Order, OrderError> {
        if !actor.is_admin() {
            return Err(OrderError::Authorization(
                "only admins may mark orders paid".to_string(),
            ));
        }
        let mut order = self.load(order_id).await?;
        order.mark_paid();
        self.orders.save_order(&order).await.map_err(storage_err)?;
        Ok(order)
    }

    async fn load(&self, order_id: Uuid) -> Result<Order, OrderError> {
        self.orders
            .get_order(order_id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// One read-modify-write against a single product document. Failures are
    /// logged, never propagated: the order is already committed (decrement)
    /// or already decided cancelled (increment).
    async fn adjust_stock(
        &self,
        order_id: Uuid,
        adjustment: &StockAdjustment,
        direction: StockDirection,
    ) {
        let product = match self.products.get_product(adjustment.product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                tracing::error!(
                    "stock adjustment skipped for order {}: product {} no longer exists",
                    order_id,
                    adjustment.product_id
                );
                return;
            }
            Err(e) => {
                tracing::error!(
                    "stock adjustment skipped for order {}: product load failed: {}",
                    order_id,
                    e
                );
                return;
            }
        };

        let mut product = product;
        match StockLedger::apply(
            &mut product,
            adjustment.variant_sku.as_deref(),
            adjustment.size.as_deref(),
            adjustment.quantity,
            direction,
        ) {
            Ok(remaining) => {
                if let Err(e) = self.products.save_product(&product).await {
                    tracing::error!(
                        "stock adjustment for order {} not persisted ({}): {}",
                        order_id,
                        adjustment.label(),
                        e
                    );
                    return;
                }
                let delta = match direction {
                    StockDirection::Decrement => -i64::from(adjustment.quantity),
                    StockDirection::Increment => i64::from(adjustment.quantity),
                };
                self.dispatcher
                    .dispatch(&DomainEvent::StockAdjusted(StockAdjustedEvent {
                        product_id: product.id,
                        variant_sku: adjustment.variant_sku.clone(),
                        size: adjustment.size.clone(),
                        delta,
                        remaining: i64::from(remaining),
                        timestamp: Utc::now().timestamp(),
                    }))
                    .await;
            }
            Err(e) => {
                tracing::error!(
                    "stock adjustment failed for order {} ({}): {}",
                    order_id,
                    adjustment.label(),
                    e
                );
            }
        }
    }

    async fn dispatch_status_change(&self, order: &Order) {
        self.dispatcher
            .dispatch(&DomainEvent::OrderStatusChanged(OrderStatusChangedEvent {
                order_id: order.id,
                customer_id: order.customer_id,
                recipient: order.customer_email.clone(),
                new_status: order.status.as_str().to_string(),
                timestamp: Utc::now().timestamp(),
            }))
            .await;
    }
}

/// The total an order puts on one stock record: a (variant SKU, size) pair
/// for variant products, the flat counter for legacy products.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StockAdjustment {
    product_id: Uuid,
    variant_sku: Option<String>,
    size: Option<String>,
    quantity: i32,
}

impl StockAdjustment {
    fn label(&self) -> String {
        match (&self.variant_sku, &self.size) {
            (Some(sku), Some(size)) => format!("{}/{}", sku, size),
            (Some(sku), None) => sku.clone(),
            (None, Some(size)) => size.clone(),
            (None, None) => "base".to_string(),
        }
    }
}

fn merge_adjustment(
    adjustments: &mut Vec<StockAdjustment>,
    product_id: Uuid,
    variant_sku: Option<String>,
    size: Option<String>,
    quantity: i32,
) {
    match adjustments.iter_mut().find(|a| {
        a.product_id == product_id && a.variant_sku == variant_sku && a.size == size
    }) {
        Some(adjustment) => adjustment.quantity += quantity,
        None => adjustments.push(StockAdjustment {
            product_id,
            variant_sku,
            size,
            quantity,
        }),
    }
}

/// Groups committed order items by the stock record they draw from, so each
/// record sees exactly one mutation per order however the lines were split.
fn aggregate_items(items: &[OrderItem]) -> Vec<StockAdjustment> {
    let mut adjustments = Vec::new();
    for item in items {
        merge_adjustment(
            &mut adjustments,
            item.product_id,
            item.variant_sku.clone(),
            item.size.clone(),
            item.quantity as i32,
        );
    }
    adjustments
}

/// Builds the immutable line snapshot from the current catalog state.
fn snapshot_item(product: &Product, line: &CheckoutItem) -> Result<OrderItem, OrderError> {
    match &product.entry {
        CatalogEntry::Legacy(entry) => Ok(OrderItem {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: entry.price_cents,
            quantity: line.quantity,
            size: line.size.clone(),
            image: entry.image.clone(),
            variant_sku: None,
            size_sku: None,
            color: None,
        }),
        CatalogEntry::Variants(_) => {
            let sku = line.variant_sku.as_deref().ok_or_else(|| {
                OrderError::Validation("variant SKU is required".to_string())
            })?;
            let variant = product
                .variant(sku)
                .ok_or_else(|| OrderError::NotFound(sku.to_string()))?;
            let size = line.size.as_deref().ok_or_else(|| {
                OrderError::Validation("size is required for variant products".to_string())
            })?;
            let record = variant
                .size_record(size)
                .ok_or_else(|| OrderError::NotFound(format!("{}/{}", sku, size)))?;
            let unit_price_cents = product
                .unit_price_cents(Some(sku))
                .map_err(availability_err)?;
            Ok(OrderItem {
                product_id: product.id,
                name: product.name.clone(),
                unit_price_cents,
                quantity: line.quantity,
                size: Some(record.size.clone()),
                image: variant.images.first().cloned(),
                variant_sku: Some(variant.sku.clone()),
                size_sku: Some(record.sku.clone()),
                color: Some(ColorSnapshot::from(&variant.color)),
            })
        }
    }
}

fn selection_label(line: &CheckoutItem) -> String {
    match (&line.variant_sku, &line.size) {
        (Some(sku), Some(size)) => format!("{}/{}", sku, size),
        (Some(sku), None) => sku.clone(),
        (None, Some(size)) => size.clone(),
        (None, None) => "base".to_string(),
    }
}

fn storage_err(e: Box<dyn std::error::Error + Send + Sync>) -> OrderError {
    OrderError::Storage(e.to_string())
}

fn availability_err(e: AvailabilityError) -> OrderError {
    match e {
        AvailabilityError::VariantNotFound(msg) | AvailabilityError::SizeNotFound(msg) => {
            OrderError::NotFound(msg)
        }
        AvailabilityError::NotPurchasable(msg) => OrderError::Validation(msg),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Out of stock: {product} ({selection}) requested {requested}, available {available}")]
    OutOfStock {
        product: String,
        selection: String,
        requested: i32,
        available: i32,
    },

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Invalid state transition from {from} to {to}")]
    Transition { from: String, to: String },

    #[error("Storage error: {0}")]
    Storage(String),
}
