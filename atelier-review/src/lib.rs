pub mod rating;
pub mod repository;
pub mod review;
pub mod service;

pub use rating::{RatingAggregator, RatingHandler};
pub use repository::ReviewRepository;
pub use review::{Review, ReviewError};
pub use service::ReviewService;
