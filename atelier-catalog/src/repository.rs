use async_trait::async_trait;
use uuid::Uuid;

use crate::category::Category;
use crate::product::Product;

/// Document-store access for products. Each save replaces one whole document;
/// the store is expected to make that write atomic per document.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(
        &self,
        product: &Product,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_product(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_products(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Product>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_product(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_product(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn count_products(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}

/// Document-store access for categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(
        &self,
        category: &Category,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_category(
        &self,
        id: Uuid,
    ) -> Result<Option<Category>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_categories(
        &self,
    ) -> Result<Vec<Category>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_category(
        &self,
        category: &Category,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_category(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
