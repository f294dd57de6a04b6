use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outbound message handed to the mail collaborator. The template name selects
/// the rendered layout; `data` carries the template variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub template: String,
    pub data: serde_json::Value,
}

/// Email delivery collaborator. Failures here must never fail the business
/// operation that triggered the notification; callers log and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        notification: &Notification,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Logs instead of sending. Used in tests and local development.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        notification: &Notification,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(
            "notification '{}' (template {}) queued for delivery",
            notification.subject,
            notification.template,
        );
        Ok(())
    }
}
