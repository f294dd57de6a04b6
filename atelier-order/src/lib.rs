pub mod coordinator;
pub mod lifecycle;
pub mod models;
pub mod notifications;
pub mod repository;

pub use coordinator::{CheckoutItem, CheckoutRules, OrderCoordinator, OrderError};
pub use models::{ColorSnapshot, Order, OrderItem, OrderStatus, ShippingAddress};
pub use notifications::NotificationHandler;
pub use repository::OrderRepository;
