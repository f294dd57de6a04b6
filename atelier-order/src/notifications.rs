use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use atelier_core::events::{DomainEvent, EventHandler};
use atelier_core::notify::{Notification, Notifier};

/// Turns order lifecycle events into customer emails. Runs behind the event
/// dispatcher, so delivery failures are logged there and never fail the
/// transition that produced the event.
pub struct NotificationHandler {
    notifier: Arc<dyn Notifier>,
}

impl NotificationHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl EventHandler for NotificationHandler {
    fn name(&self) -> &str {
        "order-notifications"
    }

    async fn handle(
        &self,
        event: &DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let notification = match event {
            DomainEvent::OrderStatusChanged(e) => {
                let (subject, template) = match e.new_status.as_str() {
                    "PENDING" => ("Your order is confirmed", "order_confirmation"),
                    "SHIPPED" => ("Your order is on its way", "order_shipped"),
                    "DELIVERED" => ("Your order has been delivered", "order_delivered"),
                    // Processing is internal; no customer email.
                    _ => return Ok(()),
                };
                Notification {
                    recipient: e.recipient.as_inner().clone(),
                    subject: subject.to_string(),
                    template: template.to_string(),
                    data: json!({ "order_id": e.order_id, "status": e.new_status }),
                }
            }
            DomainEvent::OrderCancelled(e) => Notification {
                recipient: e.recipient.as_inner().clone(),
                subject: "Your order has been cancelled".to_string(),
                template: "order_cancelled".to_string(),
                data: json!({ "order_id": e.order_id }),
            },
            _ => return Ok(()),
        };

        self.notifier.notify(&notification).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_shared::models::events::OrderStatusChangedEvent;
    use atelier_shared::pii::Masked;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(
            &self,
            notification: &Notification,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn status_event(status: &str) -> DomainEvent {
        DomainEvent::OrderStatusChanged(OrderStatusChangedEvent {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            recipient: Masked::new("customer@example.com".to_string()),
            new_status: status.to_string(),
            timestamp: 0,
        })
    }

    #[tokio::test]
    async fn test_shipped_event_sends_email() {
        let notifier = Arc::new(RecordingNotifier {
            sent: Mutex::new(Vec::new()),
        });
        let handler = NotificationHandler::new(notifier.clone());

        handler.handle(&status_event("SHIPPED")).await.unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].template, "order_shipped");
        assert_eq!(sent[0].recipient, "customer@example.com");
    }

    #[tokio::test]
    async fn test_processing_is_silent() {
        let notifier = Arc::new(RecordingNotifier {
            sent: Mutex::new(Vec::new()),
        });
        let handler = NotificationHandler::new(notifier.clone());

        handler.handle(&status_event("PROCESSING")).await.unwrap();

        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}
