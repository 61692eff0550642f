//! In-memory mock implementations for billing-related repository traits and
//! the product webhook port.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::product_webhook::ProductWebhookSender,
        use_cases::billing::{
            CreateSubscriptionInput, ProductPlanProfile, ProductProfile, ProductRepoTrait,
            SubscriptionProfile, SubscriptionRepoTrait, SubscriptionState,
        },
    },
    domain::entities::subscription::SubscriptionStatus,
};

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

/// Rows are kept in insertion order; "most recent" ties resolve to the last
/// inserted row.
#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<Vec<SubscriptionProfile>>,
    conflicts_left: Mutex<usize>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<SubscriptionProfile>) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions),
            conflicts_left: Mutex::new(0),
        }
    }

    pub fn insert(&self, subscription: SubscriptionProfile) {
        self.subscriptions.lock().unwrap().push(subscription);
    }

    pub fn get(&self, id: Uuid) -> Option<SubscriptionProfile> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn all(&self) -> Vec<SubscriptionProfile> {
        self.subscriptions.lock().unwrap().clone()
    }

    /// Makes the next `n` version-checked updates lose the race, as if another
    /// writer bumped the row first.
    pub fn fail_next_updates(&self, n: usize) {
        *self.conflicts_left.lock().unwrap() = n;
    }

    pub fn set_status_for(&self, company_id: Uuid, status: SubscriptionStatus) {
        for subscription in self.subscriptions.lock().unwrap().iter_mut() {
            if subscription.company_id == company_id {
                subscription.status = status;
            }
        }
    }

    fn latest_where(
        &self,
        predicate: impl Fn(&SubscriptionProfile) -> bool,
    ) -> Option<SubscriptionProfile> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| predicate(s))
            .max_by_key(|s| s.created_at)
            .cloned()
    }
}

#[async_trait]
impl SubscriptionRepoTrait for InMemorySubscriptionRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self.get(id))
    }

    async fn get_by_gateway_subscription_id(
        &self,
        gateway_subscription_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self.latest_where(|s| {
            s.gateway_subscription_id.as_deref() == Some(gateway_subscription_id)
        }))
    }

    async fn get_by_gateway_key(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        gateway_subscription_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self.latest_where(|s| {
            s.company_id == company_id
                && s.product_id == product_id
                && s.gateway_subscription_id.as_deref() == Some(gateway_subscription_id)
        }))
    }

    async fn get_current(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self.latest_where(|s| {
            s.company_id == company_id && s.product_id == product_id && s.status.is_current()
        }))
    }

    async fn get_latest(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self.latest_where(|s| s.company_id == company_id && s.product_id == product_id))
    }

    async fn create(&self, input: &CreateSubscriptionInput) -> AppResult<SubscriptionProfile> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        // Mirrors the partial unique index on the created-event key
        if let Some(gateway_id) = &input.gateway_subscription_id {
            let duplicate = subscriptions.iter().any(|s| {
                s.company_id == input.company_id
                    && s.product_id == input.product_id
                    && s.gateway_subscription_id.as_ref() == Some(gateway_id)
            });
            if duplicate {
                return Err(AppError::Conflict(
                    "A record with this value already exists".into(),
                ));
            }
        }

        // Mirrors the one-current-subscription index
        if input.status.is_current()
            && subscriptions.iter().any(|s| {
                s.company_id == input.company_id
                    && s.product_id == input.product_id
                    && s.status.is_current()
            })
        {
            return Err(AppError::Conflict(
                "A record with this value already exists".into(),
            ));
        }

        let now = Utc::now();
        let subscription = SubscriptionProfile {
            id: Uuid::new_v4(),
            company_id: input.company_id,
            product_id: input.product_id,
            plan_id: input.plan_id,
            plan: input.plan.clone(),
            status: input.status,
            billing_cycle: Some(input.billing_cycle),
            current_period_start: input.current_period_start,
            current_period_end: input.current_period_end,
            canceled_at: None,
            gateway: Some(input.gateway),
            gateway_subscription_id: input.gateway_subscription_id.clone(),
            monthly_amount: input.monthly_amount,
            version: 1,
            created_at: Some(now),
            updated_at: Some(now),
        };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn update_if_version(
        &self,
        id: Uuid,
        expected_version: i32,
        state: &SubscriptionState,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let Some(row) = subscriptions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        let mut conflicts_left = self.conflicts_left.lock().unwrap();
        if *conflicts_left > 0 {
            *conflicts_left -= 1;
            row.version += 1;
            return Ok(None);
        }

        if row.version != expected_version {
            return Ok(None);
        }

        row.plan_id = state.plan_id;
        row.plan = state.plan.clone();
        row.status = state.status;
        row.billing_cycle = state.billing_cycle;
        row.monthly_amount = state.monthly_amount;
        row.current_period_start = state.current_period_start;
        row.current_period_end = state.current_period_end;
        row.canceled_at = state.canceled_at;
        row.version += 1;
        row.updated_at = Some(Utc::now());
        Ok(Some(row.clone()))
    }
}

// ============================================================================
// InMemoryProductRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryProductRepo {
    pub products: Mutex<HashMap<Uuid, ProductProfile>>,
    pub plans: Mutex<HashMap<Uuid, ProductPlanProfile>>,
}

impl InMemoryProductRepo {
    pub fn with_products(products: Vec<ProductProfile>) -> Self {
        Self {
            products: Mutex::new(products.into_iter().map(|p| (p.id, p)).collect()),
            plans: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_plan(&self, plan: ProductPlanProfile) {
        self.plans.lock().unwrap().insert(plan.id, plan);
    }
}

#[async_trait]
impl ProductRepoTrait for InMemoryProductRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<ProductProfile>> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<ProductPlanProfile>> {
        Ok(self.plans.lock().unwrap().get(&plan_id).cloned())
    }
}

// ============================================================================
// Product webhook senders
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentWebhook {
    pub url: String,
    pub secret: String,
    pub body: String,
}

/// Records every delivery and answers 200.
#[derive(Default)]
pub struct RecordingWebhookSender {
    sent: Mutex<Vec<SentWebhook>>,
}

impl RecordingWebhookSender {
    pub fn sent(&self) -> Vec<SentWebhook> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductWebhookSender for RecordingWebhookSender {
    async fn send(&self, url: &str, secret: &str, body: &str) -> AppResult<u16> {
        self.sent.lock().unwrap().push(SentWebhook {
            url: url.to_string(),
            secret: secret.to_string(),
            body: body.to_string(),
        });
        Ok(200)
    }
}

/// Simulates an unreachable product backend.
pub struct FailingWebhookSender;

#[async_trait]
impl ProductWebhookSender for FailingWebhookSender {
    async fn send(&self, url: &str, _secret: &str, _body: &str) -> AppResult<u16> {
        Err(AppError::Upstream(format!("connection refused: {url}")))
    }
}
