use async_trait::async_trait;
use uuid::Uuid;

use crate::models::Order;

/// Document-store access for orders. Saves replace the whole order document.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(
        &self,
        order: &Order,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_order(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_orders(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn count_orders(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}
