use std::sync::Arc;

use serde::Serialize;
use sincla_types::SubscriptionSummary;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::product_webhook::ProductWebhookSender,
        use_cases::billing::{NotificationTarget, ProductRepoTrait, SubscriptionRepoTrait},
    },
    domain::entities::billing_event::NormalizedBillingEvent,
};

/// Body POSTed to a product's webhook after a billing change.
#[derive(Debug, Serialize)]
pub struct ProductNotification<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub event: &'a NormalizedBillingEvent,
    pub company_id: Uuid,
    pub subscription: Option<SubscriptionSummary>,
}

/// What happened to a notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered(u16),
    Rejected(u16),
    NoWebhook,
}

pub struct ProductNotifier {
    products: Arc<dyn ProductRepoTrait>,
    subscriptions: Arc<dyn SubscriptionRepoTrait>,
    sender: Arc<dyn ProductWebhookSender>,
}

impl ProductNotifier {
    pub fn new(
        products: Arc<dyn ProductRepoTrait>,
        subscriptions: Arc<dyn SubscriptionRepoTrait>,
        sender: Arc<dyn ProductWebhookSender>,
    ) -> Self {
        Self {
            products,
            subscriptions,
            sender,
        }
    }

    /// Tells the owning product about `event`, attaching a fresh snapshot of
    /// the company's subscription.
    pub async fn notify(
        &self,
        event: &NormalizedBillingEvent,
        target: NotificationTarget,
    ) -> AppResult<NotifyOutcome> {
        let product = self
            .products
            .get_by_id(target.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

        let Some(url) = product.webhook_url.as_deref().filter(|u| !u.is_empty()) else {
            return Ok(NotifyOutcome::NoWebhook);
        };

        let snapshot = match self
            .subscriptions
            .get_current(target.company_id, target.product_id)
            .await?
        {
            Some(current) => Some(current),
            None => {
                self.subscriptions
                    .get_latest(target.company_id, target.product_id)
                    .await?
            }
        };

        let body = serde_json::to_string(&ProductNotification {
            kind: "billing_event",
            event,
            company_id: target.company_id,
            subscription: snapshot.map(|s| s.to_summary()),
        })
        .map_err(|e| AppError::Internal(format!("Failed to encode notification: {e}")))?;

        let secret = product.webhook_secret.as_deref().unwrap_or_default();
        let status = self.sender.send(url, secret, &body).await?;

        if (200..300).contains(&status) {
            Ok(NotifyOutcome::Delivered(status))
        } else {
            Ok(NotifyOutcome::Rejected(status))
        }
    }

    /// Runs `notify` on a detached task. The caller's response never waits
    /// on it, and failures are only logged.
    pub fn spawn_notify(
        self: Arc<Self>,
        event: NormalizedBillingEvent,
        target: NotificationTarget,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            match self.notify(&event, target).await {
                Ok(NotifyOutcome::Delivered(status)) => info!(
                    product_id = %target.product_id,
                    company_id = %target.company_id,
                    event_type = event.kind.as_str(),
                    status,
                    "Product notified"
                ),
                Ok(NotifyOutcome::Rejected(status)) => warn!(
                    product_id = %target.product_id,
                    event_type = event.kind.as_str(),
                    status,
                    "Product webhook answered with an error status"
                ),
                Ok(NotifyOutcome::NoWebhook) => tracing::debug!(
                    product_id = %target.product_id,
                    "Product has no webhook configured"
                ),
                Err(e) => warn!(
                    product_id = %target.product_id,
                    event_type = event.kind.as_str(),
                    error = %e,
                    "Product notification failed"
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        billing_event::{BillingEventData, BillingEventKind},
        gateway::Gateway,
        subscription::SubscriptionStatus,
    };
    use crate::test_utils::{
        FailingWebhookSender, InMemoryProductRepo, InMemorySubscriptionRepo,
        RecordingWebhookSender, create_test_product, create_test_subscription,
    };

    fn canceled_event() -> NormalizedBillingEvent {
        NormalizedBillingEvent {
            kind: BillingEventKind::SubscriptionCanceled,
            gateway: Gateway::Stripe,
            data: BillingEventData {
                subscription_id: Some("sub_1".into()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn posts_billing_event_with_snapshot() {
        let product = create_test_product(|p| {
            p.webhook_url = Some("https://rh.example.com/hooks/hub".into());
            p.webhook_secret = Some("whsec_rh".into());
        });
        let company_id = Uuid::new_v4();
        let subscription = create_test_subscription(company_id, product.id, |s| {
            s.status = SubscriptionStatus::Canceled
        });
        let target = NotificationTarget {
            company_id,
            product_id: product.id,
        };
        let sender = Arc::new(RecordingWebhookSender::default());
        let notifier = ProductNotifier::new(
            Arc::new(InMemoryProductRepo::with_products(vec![product])),
            Arc::new(InMemorySubscriptionRepo::with_subscriptions(vec![
                subscription,
            ])),
            sender.clone(),
        );

        let outcome = notifier.notify(&canceled_event(), target).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::Delivered(200));

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://rh.example.com/hooks/hub");
        assert_eq!(sent[0].secret, "whsec_rh");

        let body: serde_json::Value = serde_json::from_str(&sent[0].body).unwrap();
        assert_eq!(body["type"], "billing_event");
        assert_eq!(body["event"]["type"], "subscription.canceled");
        assert_eq!(body["company_id"], company_id.to_string());
        assert_eq!(body["subscription"]["status"], "canceled");
    }

    #[tokio::test]
    async fn skips_products_without_webhook() {
        let product = create_test_product(|p| p.webhook_url = None);
        let target = NotificationTarget {
            company_id: Uuid::new_v4(),
            product_id: product.id,
        };
        let sender = Arc::new(RecordingWebhookSender::default());
        let notifier = ProductNotifier::new(
            Arc::new(InMemoryProductRepo::with_products(vec![product])),
            Arc::new(InMemorySubscriptionRepo::default()),
            sender.clone(),
        );

        let outcome = notifier.notify(&canceled_event(), target).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::NoWebhook);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn spawned_failure_is_swallowed() {
        let product =
            create_test_product(|p| p.webhook_url = Some("https://down.example.com".into()));
        let target = NotificationTarget {
            company_id: Uuid::new_v4(),
            product_id: product.id,
        };
        let notifier = Arc::new(ProductNotifier::new(
            Arc::new(InMemoryProductRepo::with_products(vec![product])),
            Arc::new(InMemorySubscriptionRepo::default()),
            Arc::new(FailingWebhookSender),
        ));

        let handle = notifier.spawn_notify(canceled_event(), target);
        assert!(handle.await.is_ok());
    }
}
