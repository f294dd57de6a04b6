use serde::{Deserialize, Serialize};

use crate::product::{CatalogEntry, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockDirection {
    Increment,
    Decrement,
}

/// Applies stock mutations to exactly one (variant SKU, size) record, or to
/// the flat counter of a legacy product. A decrement that would go negative
/// fails without touching the record; increments are unbounded (restock).
pub struct StockLedger;

impl StockLedger {
    /// Returns the resulting stock level on success.
    pub fn apply(
        product: &mut Product,
        variant_sku: Option<&str>,
        size: Option<&str>,
        quantity: i32,
        direction: StockDirection,
    ) -> Result<i32, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let remaining = match &mut product.entry {
            CatalogEntry::Legacy(entry) => {
                if let Some(sku) = variant_sku {
                    return Err(StockError::NotFound(sku.to_string()));
                }
                apply_to(&mut entry.stock, quantity, direction)?
            }
            CatalogEntry::Variants(entry) => {
                let sku = variant_sku
                    .ok_or_else(|| StockError::NotFound("variant SKU is required".to_string()))?;
                let size = size
                    .ok_or_else(|| StockError::NotFound("size is required".to_string()))?;
                let variant = entry
                    .variants
                    .iter_mut()
                    .find(|v| v.sku == sku)
                    .ok_or_else(|| StockError::NotFound(sku.to_string()))?;
                let record = variant
                    .sizes
                    .iter_mut()
                    .find(|s| s.size == size)
                    .ok_or_else(|| StockError::NotFound(format!("{}/{}", sku, size)))?;
                apply_to(&mut record.stock, quantity, direction)?
            }
        };

        product.touch();
        Ok(remaining)
    }
}

fn apply_to(stock: &mut i32, quantity: i32, direction: StockDirection) -> Result<i32, StockError> {
    match direction {
        StockDirection::Decrement => {
            if *stock - quantity < 0 {
                return Err(StockError::InsufficientStock {
                    requested: quantity,
                    available: *stock,
                });
            }
            *stock -= quantity;
        }
        StockDirection::Increment => {
            *stock += quantity;
        }
    }
    Ok(*stock)
}

#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Stock record not found: {0}")]
    NotFound(String),

    #[error("Invalid stock quantity: {0}")]
    InvalidQuantity(i32),
}
