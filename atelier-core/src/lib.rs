pub mod events;
pub mod identity;
pub mod notify;
