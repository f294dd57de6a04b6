use serde::{Deserialize, Serialize};

use crate::sku;

pub const MAX_VARIANT_IMAGES: usize = 5;
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

/// Lifecycle state for a variant. Retiring is a soft delete: stock and SKUs
/// stay behind so historical order snapshots keep resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantState {
    Active,
    Retired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    /// `#RRGGBB`
    pub hex: String,
    /// Short code carried into SKUs, e.g. `NVY`.
    pub code: String,
}

impl Color {
    pub fn validate(&self) -> Result<(), VariantError> {
        if self.name.trim().is_empty() || self.code.trim().is_empty() {
            return Err(VariantError::Validation(
                "color name and code are required".to_string(),
            ));
        }
        if !is_hex_color(&self.hex) {
            return Err(VariantError::Validation(format!(
                "invalid hex color: {}",
                self.hex
            )));
        }
        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Per-size stock record. `stock >= 0` always; the stock ledger rejects any
/// mutation that would violate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStock {
    pub size: String,
    pub stock: i32,
    pub sku: String,
    pub low_stock_threshold: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub sku: String,
    pub color: Color,
    pub images: Vec<String>,
    /// `None` means the product base price applies.
    pub price_override_cents: Option<i64>,
    pub sizes: Vec<SizeStock>,
    pub state: VariantState,
}

impl Variant {
    pub fn is_active(&self) -> bool {
        self.state == VariantState::Active
    }

    pub fn size_record(&self, size: &str) -> Option<&SizeStock> {
        self.sizes.iter().find(|s| s.size == size)
    }
}

/// Admin input for a new variant. SKUs are generated, never supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInput {
    pub color: Color,
    pub images: Vec<String>,
    pub price_override_cents: Option<i64>,
    pub sizes: Vec<SizeStockInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeStockInput {
    pub size: String,
    pub stock: i32,
    pub low_stock_threshold: Option<i32>,
}

/// Partial update for an existing variant. `price_override_cents` is doubly
/// optional so a patch can clear the override back to the base price.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantPatch {
    pub color: Option<Color>,
    pub images: Option<Vec<String>>,
    pub price_override_cents: Option<Option<i64>>,
    pub sizes: Option<Vec<SizeStockInput>>,
    pub state: Option<VariantState>,
}

/// Variant-backed catalog entry: base price plus an ordered list of color
/// variants, each with per-size stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantProduct {
    pub base_price_cents: i64,
    pub variants: Vec<Variant>,
}

impl VariantProduct {
    pub fn new(base_price_cents: i64) -> Self {
        Self {
            base_price_cents,
            variants: Vec::new(),
        }
    }

    pub fn variant(&self, sku: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.sku == sku)
    }

    pub fn active_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(|v| v.is_active())
    }

    /// Validates and appends a new variant. The SKU is derived from the
    /// product name and color code, and rejected on collision with any
    /// existing variant on this product, retired ones included.
    pub fn add_variant(
        &mut self,
        product_name: &str,
        input: VariantInput,
    ) -> Result<&Variant, VariantError> {
        input.color.validate()?;
        validate_images(&input.images)?;
        if input.sizes.is_empty() {
            return Err(VariantError::Validation(
                "at least one size entry is required".to_string(),
            ));
        }

        let variant_sku = sku::generate_sku(product_name, &input.color.code, None);
        if self.variants.iter().any(|v| v.sku == variant_sku) {
            return Err(VariantError::DuplicateSku(variant_sku));
        }

        let sizes = build_sizes(product_name, &input.color.code, &input.sizes)?;
        let index = self.variants.len();
        self.variants.push(Variant {
            sku: variant_sku,
            color: input.color,
            images: input.images,
            price_override_cents: input.price_override_cents,
            sizes,
            state: VariantState::Active,
        });
        Ok(&self.variants[index])
    }

    /// Partial update. The variant SKU itself is stable across edits; patched
    /// size lists get freshly generated size SKUs from the (possibly patched)
    /// color code.
    pub fn update_variant(
        &mut self,
        product_name: &str,
        variant_sku: &str,
        patch: VariantPatch,
    ) -> Result<&Variant, VariantError> {
        let index = self
            .variants
            .iter()
            .position(|v| v.sku == variant_sku)
            .ok_or_else(|| VariantError::NotFound(variant_sku.to_string()))?;

        if let Some(color) = &patch.color {
            color.validate()?;
        }
        if let Some(images) = &patch.images {
            validate_images(images)?;
        }

        let variant = &mut self.variants[index];
        if let Some(color) = patch.color {
            variant.color = color;
        }
        if let Some(images) = patch.images {
            variant.images = images;
        }
        if let Some(price_override_cents) = patch.price_override_cents {
            variant.price_override_cents = price_override_cents;
        }
        if let Some(sizes) = patch.sizes {
            if sizes.is_empty() {
                return Err(VariantError::Validation(
                    "at least one size entry is required".to_string(),
                ));
            }
            variant.sizes = build_sizes(product_name, &variant.color.code, &sizes)?;
        }
        if let Some(state) = patch.state {
            variant.state = state;
        }
        Ok(&self.variants[index])
    }

    /// Soft delete: flips the variant to Retired, keeping its stock data.
    pub fn retire_variant(&mut self, variant_sku: &str) -> Result<(), VariantError> {
        let variant = self
            .variants
            .iter_mut()
            .find(|v| v.sku == variant_sku)
            .ok_or_else(|| VariantError::NotFound(variant_sku.to_string()))?;
        variant.state = VariantState::Retired;
        Ok(())
    }
}

fn validate_images(images: &[String]) -> Result<(), VariantError> {
    if images.is_empty() || images.len() > MAX_VARIANT_IMAGES {
        return Err(VariantError::Validation(format!(
            "a variant carries between 1 and {} images",
            MAX_VARIANT_IMAGES
        )));
    }
    Ok(())
}

fn build_sizes(
    product_name: &str,
    color_code: &str,
    inputs: &[SizeStockInput],
) -> Result<Vec<SizeStock>, VariantError> {
    let mut sizes: Vec<SizeStock> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let label = input.size.trim();
        if label.is_empty() {
            return Err(VariantError::Validation(
                "size label is required".to_string(),
            ));
        }
        if input.stock < 0 {
            return Err(VariantError::Validation(format!(
                "stock for size {} cannot be negative",
                label
            )));
        }
        if sizes.iter().any(|s| s.size == label) {
            return Err(VariantError::Validation(format!(
                "duplicate size label: {}",
                label
            )));
        }
        sizes.push(SizeStock {
            size: label.to_string(),
            stock: input.stock,
            sku: sku::generate_sku(product_name, color_code, Some(label)),
            low_stock_threshold: input
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        });
    }
    Ok(sizes)
}

#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error("Variant validation failed: {0}")]
    Validation(String),

    #[error("Duplicate variant SKU: {0}")]
    DuplicateSku(String),

    #[error("Variant not found: {0}")]
    NotFound(String),
}
