use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use atelier_core::events::{DomainEvent, EventDispatcher};
use atelier_core::identity::Actor;
use atelier_order::models::OrderStatus;
use atelier_order::repository::OrderRepository;
use atelier_shared::models::events::{ReviewRemovedEvent, ReviewSavedEvent};

use crate::repository::ReviewRepository;
use crate::review::{Review, ReviewError};

/// Write path for reviews. Rating recomputation is not called from here; it
/// subscribes to the dispatched review events.
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    orders: Arc<dyn OrderRepository>,
    dispatcher: Arc<EventDispatcher>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        orders: Arc<dyn OrderRepository>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            reviews,
            orders,
            dispatcher,
        }
    }

    /// One review per (product, user). The verified-purchase flag is frozen
    /// here from the actor's order history.
    pub async fn create_review(
        &self,
        actor: &Actor,
        product_id: Uuid,
        user_name: String,
        rating: u8,
        comment: String,
    ) -> Result<Review, ReviewError> {
        let existing = self
            .reviews
            .find_by_product_and_user(product_id, actor.user_id)
            .await
            .map_err(storage_err)?;
        if existing.is_some() {
            return Err(ReviewError::Duplicate(
                "user has already reviewed this product".to_string(),
            ));
        }

        let verified = self.has_purchased(actor.user_id, product_id).await?;
        let review = Review::new(
            product_id,
            actor.user_id,
            user_name,
            rating,
            comment,
            verified,
        )?;
        self.reviews
            .create_review(&review)
            .await
            .map_err(storage_err)?;

        self.dispatch_saved(&review).await;
        Ok(review)
    }

    /// Owner-only edit.
    pub async fn update_review(
        &self,
        actor: &Actor,
        review_id: Uuid,
        rating: u8,
        comment: String,
    ) -> Result<Review, ReviewError> {
        let mut review = self.load(review_id).await?;
        if review.user_id != actor.user_id {
            return Err(ReviewError::Authorization(
                "only the review author may edit it".to_string(),
            ));
        }

        review.revise(rating, comment)?;
        self.reviews
            .save_review(&review)
            .await
            .map_err(storage_err)?;

        self.dispatch_saved(&review).await;
        Ok(review)
    }

    /// Owner or admin. Triggers a rating recompute via the removed event.
    pub async fn delete_review(&self, actor: &Actor, review_id: Uuid) -> Result<(), ReviewError> {
        let review = self.load(review_id).await?;
        if !actor.can_access(review.user_id) {
            return Err(ReviewError::Authorization(
                "only the review author or an admin may delete it".to_string(),
            ));
        }

        self.reviews
            .delete_review(review.id)
            .await
            .map_err(storage_err)?;

        self.dispatcher
            .dispatch(&DomainEvent::ReviewRemoved(ReviewRemovedEvent {
                review_id: review.id,
                product_id: review.product_id,
                timestamp: Utc::now().timestamp(),
            }))
            .await;
        Ok(())
    }

    /// Any non-cancelled order containing the product counts as a purchase.
    async fn has_purchased(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, ReviewError> {
        let orders = self
            .orders
            .list_orders(Some(user_id))
            .await
            .map_err(storage_err)?;
        Ok(orders.iter().any(|order| {
            order.status != OrderStatus::Cancelled
                && order.items.iter().any(|item| item.product_id == product_id)
        }))
    }

    async fn load(&self, review_id: Uuid) -> Result<Review, ReviewError> {
        self.reviews
            .get_review(review_id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| ReviewError::NotFound(review_id.to_string()))
    }

    async fn dispatch_saved(&self, review: &Review) {
        self.dispatcher
            .dispatch(&DomainEvent::ReviewSaved(ReviewSavedEvent {
                review_id: review.id,
                product_id: review.product_id,
                user_id: review.user_id,
                timestamp: Utc::now().timestamp(),
            }))
            .await;
    }
}

fn storage_err(e: Box<dyn std::error::Error + Send + Sync>) -> ReviewError {
    ReviewError::Storage(e.to_string())
}
