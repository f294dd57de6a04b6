use async_trait::async_trait;
use uuid::Uuid;

use crate::review::Review;

/// Document-store access for reviews.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create_review(
        &self,
        review: &Review,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_review(
        &self,
        id: Uuid,
    ) -> Result<Option<Review>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_product_and_user(
        &self,
        product_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<Review>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_review(
        &self,
        review: &Review,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_review(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
