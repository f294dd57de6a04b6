use async_trait::async_trait;
use std::sync::Arc;

use atelier_shared::models::events::{
    OrderCancelledEvent, OrderStatusChangedEvent, ReviewRemovedEvent, ReviewSavedEvent,
    StockAdjustedEvent,
};

/// Domain events emitted by the write paths. Cascading side effects (rating
/// recomputation, status emails) subscribe here instead of being called inline.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    StockAdjusted(StockAdjustedEvent),
    OrderStatusChanged(OrderStatusChangedEvent),
    OrderCancelled(OrderCancelledEvent),
    ReviewSaved(ReviewSavedEvent),
    ReviewRemoved(ReviewRemovedEvent),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Short name used when logging handler failures.
    fn name(&self) -> &str;

    async fn handle(
        &self,
        event: &DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// In-process fan-out to registered handlers. Delivery is best-effort: a
/// failing handler is logged and never fails the dispatching operation.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub async fn dispatch(&self, event: &DomainEvent) {
        for handler in &self.handlers {
            if let Err(e) = handler.handle(event).await {
                tracing::error!("event handler '{}' failed: {}", handler.name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountingHandler {
        seen: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        fn name(&self) -> &str {
            "counting"
        }

        async fn handle(
            &self,
            _event: &DomainEvent,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err("simulated handler failure".into());
            }
            Ok(())
        }
    }

    fn review_saved() -> DomainEvent {
        DomainEvent::ReviewSaved(ReviewSavedEvent {
            review_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            timestamp: 0,
        })
    }

    #[tokio::test]
    async fn test_dispatch_reaches_all_handlers() {
        let first = Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
            fail: true,
        });
        let second = Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
            fail: false,
        });

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(first.clone());
        dispatcher.register(second.clone());

        // A failing handler must not stop delivery to the rest.
        dispatcher.dispatch(&review_saved()).await;

        assert_eq!(first.seen.load(Ordering::SeqCst), 1);
        assert_eq!(second.seen.load(Ordering::SeqCst), 1);
    }
}
