use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::{availability_of, Availability, AvailabilityError};
use crate::variant::{Variant, VariantProduct, DEFAULT_LOW_STOCK_THRESHOLD};

/// Product lifecycle state. Archiving is a soft delete; read paths filter on
/// it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductState {
    Active,
    Archived,
}

/// A catalog product. The purchasable inventory lives in `entry`, which
/// discriminates between the legacy flat representation and the variant
/// system instead of overlapping nullable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub entry: CatalogEntry,
    /// Aggregate of all reviews, 0–5 with one decimal. Maintained by the
    /// rating aggregator, never written directly.
    pub rating: f64,
    pub num_reviews: u32,
    pub state: ProductState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogEntry {
    Legacy(LegacyProduct),
    Variants(VariantProduct),
}

/// Pre-variant representation: one price, one image, one flat stock counter,
/// a plain list of size labels. Kept for products created before the variant
/// system existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyProduct {
    pub price_cents: i64,
    pub image: Option<String>,
    pub stock: i32,
    pub sizes: Vec<String>,
}

impl Product {
    pub fn new(name: String, category_id: Uuid, entry: CatalogEntry) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            category_id,
            entry,
            rating: 0.0,
            num_reviews: 0,
            state: ProductState::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == ProductState::Active
    }

    pub fn archive(&mut self) {
        self.state = ProductState::Archived;
        self.touch();
    }

    /// Written by the rating aggregator after every review create/delete.
    pub fn set_rating(&mut self, rating: f64, num_reviews: u32) {
        self.rating = rating;
        self.num_reviews = num_reviews;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Availability for a concrete selection, refusing archived products.
    pub fn availability(
        &self,
        variant_sku: Option<&str>,
        size: Option<&str>,
    ) -> Result<Availability, AvailabilityError> {
        if !self.is_active() {
            return Err(AvailabilityError::NotPurchasable(self.name.clone()));
        }
        self.entry.availability_for(variant_sku, size)
    }

    pub fn unit_price_cents(&self, variant_sku: Option<&str>) -> Result<i64, AvailabilityError> {
        self.entry.price_for(variant_sku)
    }

    pub fn variant(&self, variant_sku: &str) -> Option<&Variant> {
        match &self.entry {
            CatalogEntry::Legacy(_) => None,
            CatalogEntry::Variants(entry) => entry.variant(variant_sku),
        }
    }
}

/// Shared capability of legacy and variant-backed products: resolve a unit
/// price and an availability snapshot for a (variant, size) selection.
pub trait PricedSizedItem {
    fn price_for(&self, variant_sku: Option<&str>) -> Result<i64, AvailabilityError>;

    fn availability_for(
        &self,
        variant_sku: Option<&str>,
        size: Option<&str>,
    ) -> Result<Availability, AvailabilityError>;
}

impl PricedSizedItem for LegacyProduct {
    fn price_for(&self, variant_sku: Option<&str>) -> Result<i64, AvailabilityError> {
        match variant_sku {
            Some(sku) => Err(AvailabilityError::VariantNotFound(sku.to_string())),
            None => Ok(self.price_cents),
        }
    }

    fn availability_for(
        &self,
        variant_sku: Option<&str>,
        size: Option<&str>,
    ) -> Result<Availability, AvailabilityError> {
        if let Some(sku) = variant_sku {
            return Err(AvailabilityError::VariantNotFound(sku.to_string()));
        }
        if let Some(size) = size {
            if !self.sizes.iter().any(|s| s == size) {
                return Err(AvailabilityError::SizeNotFound(size.to_string()));
            }
        }
        Ok(availability_of(self.stock, DEFAULT_LOW_STOCK_THRESHOLD))
    }
}

impl PricedSizedItem for VariantProduct {
    fn price_for(&self, variant_sku: Option<&str>) -> Result<i64, AvailabilityError> {
        let sku = variant_sku.ok_or_else(|| {
            AvailabilityError::VariantNotFound("variant SKU is required".to_string())
        })?;
        let variant = self
            .variant(sku)
            .ok_or_else(|| AvailabilityError::VariantNotFound(sku.to_string()))?;
        Ok(variant.price_override_cents.unwrap_or(self.base_price_cents))
    }

    fn availability_for(
        &self,
        variant_sku: Option<&str>,
        size: Option<&str>,
    ) -> Result<Availability, AvailabilityError> {
        let sku = variant_sku.ok_or_else(|| {
            AvailabilityError::VariantNotFound("variant SKU is required".to_string())
        })?;
        // Retired variants are invisible to the purchase path.
        let variant = self
            .active_variants()
            .find(|v| v.sku == sku)
            .ok_or_else(|| AvailabilityError::VariantNotFound(sku.to_string()))?;
        let size = size.ok_or_else(|| {
            AvailabilityError::SizeNotFound("size is required for variant products".to_string())
        })?;
        let record = variant
            .size_record(size)
            .ok_or_else(|| AvailabilityError::SizeNotFound(format!("{}/{}", sku, size)))?;
        Ok(availability_of(record.stock, record.low_stock_threshold))
    }
}

impl PricedSizedItem for CatalogEntry {
    fn price_for(&self, variant_sku: Option<&str>) -> Result<i64, AvailabilityError> {
        match self {
            CatalogEntry::Legacy(entry) => entry.price_for(variant_sku),
            CatalogEntry::Variants(entry) => entry.price_for(variant_sku),
        }
    }

    fn availability_for(
        &self,
        variant_sku: Option<&str>,
        size: Option<&str>,
    ) -> Result<Availability, AvailabilityError> {
        match self {
            CatalogEntry::Legacy(entry) => entry.availability_for(variant_sku, size),
            CatalogEntry::Variants(entry) => entry.availability_for(variant_sku, size),
        }
    }
}
