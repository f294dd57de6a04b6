use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_COMMENT_LEN: usize = 500;

/// A customer review. Unique per (product, user); the service rejects a
/// second review from the same user as a conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    /// 1–5 integer stars.
    pub rating: u8,
    pub comment: String,
    /// Derived from the user's order history at creation time and never
    /// recomputed afterwards.
    pub verified_purchase: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        product_id: Uuid,
        user_id: Uuid,
        user_name: String,
        rating: u8,
        comment: String,
        verified_purchase: bool,
    ) -> Result<Self, ReviewError> {
        validate_rating(rating)?;
        validate_comment(&comment)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            product_id,
            user_id,
            user_name,
            rating,
            comment,
            verified_purchase,
            created_at: now,
            updated_at: now,
        })
    }

    /// Owner edit; `verified_purchase` stays frozen.
    pub fn revise(&mut self, rating: u8, comment: String) -> Result<(), ReviewError> {
        validate_rating(rating)?;
        validate_comment(&comment)?;
        self.rating = rating;
        self.comment = comment;
        self.updated_at = Utc::now();
        Ok(())
    }
}

pub fn validate_rating(rating: u8) -> Result<(), ReviewError> {
    if !(1..=5).contains(&rating) {
        return Err(ReviewError::Validation(format!(
            "rating must be between 1 and 5, got {}",
            rating
        )));
    }
    Ok(())
}

pub fn validate_comment(comment: &str) -> Result<(), ReviewError> {
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(ReviewError::Validation(format!(
            "comment exceeds {} characters",
            MAX_COMMENT_LEN
        )));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Review validation failed: {0}")]
    Validation(String),

    #[error("Duplicate review: {0}")]
    Duplicate(String),

    #[error("Review not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_comment_length_bound() {
        assert!(validate_comment(&"a".repeat(500)).is_ok());
        assert!(validate_comment(&"a".repeat(501)).is_err());
    }

    #[test]
    fn test_revise_keeps_verified_flag() {
        let mut review = Review::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Ada".to_string(),
            5,
            "Great fit".to_string(),
            true,
        )
        .unwrap();

        review.revise(3, "Shrank in the wash".to_string()).unwrap();
        assert_eq!(review.rating, 3);
        assert!(review.verified_purchase);
    }
}
