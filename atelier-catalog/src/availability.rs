use serde::{Deserialize, Serialize};

use crate::variant::{Color, VariantProduct};

/// Availability snapshot for one (variant, size) selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    pub stock: i32,
    /// `0 < stock <= low_stock_threshold`
    pub low_stock: bool,
}

pub fn availability_of(stock: i32, low_stock_threshold: i32) -> Availability {
    Availability {
        available: stock > 0,
        stock,
        low_stock: stock > 0 && stock <= low_stock_threshold,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeAvailability {
    pub size: String,
    pub sku: String,
    pub stock: i32,
    pub available: bool,
    pub low_stock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantAvailability {
    pub sku: String,
    pub color: Color,
    pub sizes: Vec<SizeAvailability>,
}

/// One snapshot covering every active variant and size, so the UI can render
/// a color x size grid without a lookup per cell.
pub fn availability_matrix(entry: &VariantProduct) -> Vec<VariantAvailability> {
    entry
        .active_variants()
        .map(|variant| VariantAvailability {
            sku: variant.sku.clone(),
            color: variant.color.clone(),
            sizes: variant
                .sizes
                .iter()
                .map(|record| {
                    let availability = availability_of(record.stock, record.low_stock_threshold);
                    SizeAvailability {
                        size: record.size.clone(),
                        sku: record.sku.clone(),
                        stock: record.stock,
                        available: availability.available,
                        low_stock: availability.low_stock,
                    }
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    #[error("Size not found: {0}")]
    SizeNotFound(String),

    #[error("Product not purchasable: {0}")]
    NotPurchasable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{SizeStockInput, VariantInput};

    fn entry_with_stocks() -> VariantProduct {
        let mut entry = VariantProduct::new(2999);
        entry
            .add_variant(
                "Classic Cotton T-Shirt",
                VariantInput {
                    color: Color {
                        name: "Navy".to_string(),
                        hex: "#001F3F".to_string(),
                        code: "NVY".to_string(),
                    },
                    images: vec!["/uploads/navy.jpg".to_string()],
                    price_override_cents: None,
                    sizes: vec![
                        SizeStockInput {
                            size: "S".to_string(),
                            stock: 0,
                            low_stock_threshold: None,
                        },
                        SizeStockInput {
                            size: "M".to_string(),
                            stock: 3,
                            low_stock_threshold: None,
                        },
                        SizeStockInput {
                            size: "L".to_string(),
                            stock: 6,
                            low_stock_threshold: None,
                        },
                    ],
                },
            )
            .unwrap();
        entry
    }

    #[test]
    fn test_matrix_flags_per_size() {
        let entry = entry_with_stocks();
        let matrix = availability_matrix(&entry);
        assert_eq!(matrix.len(), 1);

        // Threshold defaults to 5: S out of stock, M available + low, L just available.
        let sizes = &matrix[0].sizes;
        assert!(!sizes[0].available && !sizes[0].low_stock);
        assert!(sizes[1].available && sizes[1].low_stock);
        assert!(sizes[2].available && !sizes[2].low_stock);
    }

    #[test]
    fn test_matrix_skips_retired_variants() {
        let mut entry = entry_with_stocks();
        entry.retire_variant("CLASSICC-NVY").unwrap();
        assert!(availability_matrix(&entry).is_empty());
    }

    #[test]
    fn test_stock_at_threshold_is_low() {
        let availability = availability_of(5, 5);
        assert!(availability.available);
        assert!(availability.low_stock);

        let availability = availability_of(6, 5);
        assert!(!availability.low_stock);
    }
}
