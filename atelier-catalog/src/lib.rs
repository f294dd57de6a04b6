pub mod availability;
pub mod category;
pub mod product;
pub mod repository;
pub mod sku;
pub mod stock;
pub mod variant;

pub use availability::{Availability, AvailabilityError};
pub use category::Category;
pub use product::{CatalogEntry, LegacyProduct, PricedSizedItem, Product, ProductState};
pub use repository::{CategoryRepository, ProductRepository};
pub use stock::{StockDirection, StockLedger};
pub use variant::{Color, SizeStock, Variant, VariantProduct, VariantState};
