use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use atelier_catalog::repository::ProductRepository;
use atelier_core::events::{DomainEvent, EventHandler};

use crate::repository::ReviewRepository;
use crate::review::Review;

/// Mean rating rounded to one decimal plus the review count. An empty set
/// resets both to zero.
pub fn aggregate(reviews: &[Review]) -> (f64, u32) {
    if reviews.is_empty() {
        return (0.0, 0);
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(sum) / reviews.len() as f64;
    ((mean * 10.0).round() / 10.0, reviews.len() as u32)
}

/// Recomputes a product's aggregate rating from the full current review set.
/// Idempotent; concurrent recomputes for the same product are last-write-wins.
pub struct RatingAggregator {
    reviews: Arc<dyn ReviewRepository>,
    products: Arc<dyn ProductRepository>,
}

impl RatingAggregator {
    pub fn new(reviews: Arc<dyn ReviewRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { reviews, products }
    }

    pub async fn recompute(
        &self,
        product_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let reviews = self.reviews.list_for_product(product_id).await?;
        let (rating, num_reviews) = aggregate(&reviews);

        let Some(mut product) = self.products.get_product(product_id).await? else {
            // Cascading product deletion can race a late recompute.
            tracing::warn!("rating recompute skipped: product {} is gone", product_id);
            return Ok(());
        };
        product.set_rating(rating, num_reviews);
        self.products.save_product(&product).await
    }
}

/// Subscribes the aggregator to review events so the write path never calls
/// it directly.
pub struct RatingHandler {
    aggregator: RatingAggregator,
}

impl RatingHandler {
    pub fn new(aggregator: RatingAggregator) -> Self {
        Self { aggregator }
    }
}

#[async_trait]
impl EventHandler for RatingHandler {
    fn name(&self) -> &str {
        "rating-aggregator"
    }

    async fn handle(
        &self,
        event: &DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match event {
            DomainEvent::ReviewSaved(e) => self.aggregator.recompute(e.product_id).await,
            DomainEvent::ReviewRemoved(e) => self.aggregator.recompute(e.product_id).await,
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_with_rating(rating: u8) -> Review {
        Review::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Ada".to_string(),
            rating,
            String::new(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_set_resets_to_zero() {
        assert_eq!(aggregate(&[]), (0.0, 0));
    }

    #[test]
    fn test_mean_rounds_to_one_decimal() {
        let reviews: Vec<Review> = [5, 3, 4].iter().map(|&r| review_with_rating(r)).collect();
        assert_eq!(aggregate(&reviews), (4.0, 3));

        let reviews: Vec<Review> = [5, 4].iter().map(|&r| review_with_rating(r)).collect();
        assert_eq!(aggregate(&reviews), (4.5, 2));

        let reviews: Vec<Review> = [5, 5, 4].iter().map(|&r| review_with_rating(r)).collect();
        // 14/3 = 4.666... rounds to 4.7
        assert_eq!(aggregate(&reviews), (4.7, 3));
    }
}
