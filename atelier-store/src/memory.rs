use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use atelier_catalog::category::Category;
use atelier_catalog::product::Product;
use atelier_catalog::repository::{CategoryRepository, ProductRepository};
use atelier_order::models::Order;
use atelier_order::repository::OrderRepository;
use atelier_review::repository::ReviewRepository;
use atelier_review::review::Review;

/// Document-store stand-in backed by per-collection `RwLock<HashMap>`s. Each
/// save replaces one whole document under the write lock, which mirrors the
/// per-document atomic update the production store is expected to provide.
#[derive(Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    reviews: Arc<RwLock<HashMap<Uuid, Review>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create_product(
        &self,
        product: &Product,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product.id)
    }

    async fn get_product(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list_products(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Product>, Box<dyn std::error::Error + Send + Sync>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| category_id.map_or(true, |c| p.category_id == c))
            .cloned()
            .collect())
    }

    async fn save_product(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn delete_product(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.products.write().await.remove(&id);
        Ok(())
    }

    async fn count_products(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create_category(
        &self,
        category: &Category,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category.id)
    }

    async fn get_category(
        &self,
        id: Uuid,
    ) -> Result<Option<Category>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn list_categories(
        &self,
    ) -> Result<Vec<Category>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.categories.read().await.values().cloned().collect())
    }

    async fn save_category(
        &self,
        category: &Category,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn delete_category(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.categories.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create_order(
        &self,
        order: &Order,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order.id)
    }

    async fn get_order(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_orders(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|o| customer_id.map_or(true, |c| o.customer_id == c))
            .cloned()
            .collect())
    }

    async fn save_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn count_orders(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.orders.read().await.len() as u64)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn create_review(
        &self,
        review: &Review,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.reviews.write().await.insert(review.id, review.clone());
        Ok(review.id)
    }

    async fn get_review(
        &self,
        id: Uuid,
    ) -> Result<Option<Review>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.reviews.read().await.get(&id).cloned())
    }

    async fn find_by_product_and_user(
        &self,
        product_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, Box<dyn std::error::Error + Send + Sync>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .values()
            .find(|r| r.product_id == product_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<Review>, Box<dyn std::error::Error + Send + Sync>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn save_review(
        &self,
        review: &Review,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.reviews.write().await.insert(review.id, review.clone());
        Ok(())
    }

    async fn delete_review(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.reviews.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_catalog::product::CatalogEntry;
    use atelier_catalog::variant::VariantProduct;

    #[tokio::test]
    async fn test_product_round_trip() {
        let store = MemoryStore::new();
        let product = Product::new(
            "Classic Cotton T-Shirt".to_string(),
            Uuid::new_v4(),
            CatalogEntry::Variants(VariantProduct::new(2999)),
        );

        store.create_product(&product).await.unwrap();
        assert_eq!(store.count_products().await.unwrap(), 1);

        let loaded = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, product.name);

        store.delete_product(product.id).await.unwrap();
        assert!(store.get_product(product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_products_filters_by_category() {
        let store = MemoryStore::new();
        let category = Uuid::new_v4();
        let in_category = Product::new(
            "Tee".to_string(),
            category,
            CatalogEntry::Variants(VariantProduct::new(2999)),
        );
        let other = Product::new(
            "Scarf".to_string(),
            Uuid::new_v4(),
            CatalogEntry::Variants(VariantProduct::new(4999)),
        );
        store.create_product(&in_category).await.unwrap();
        store.create_product(&other).await.unwrap();

        let filtered = store.list_products(Some(category)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, in_category.id);
        assert_eq!(store.list_products(None).await.unwrap().len(), 2);
    }
}
