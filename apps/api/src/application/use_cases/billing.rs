use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sincla_types::{SubscriptionCheck, SubscriptionSummary};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        billing_event::{BillingEventData, BillingEventKind, NormalizedBillingEvent},
        gateway::Gateway,
        subscription::{BillingCycle, SubscriptionStatus},
    },
};

// ============================================================================
// Constants
// ============================================================================

/// Compare-and-swap attempts before an update is reported as failed.
pub const MAX_UPDATE_ATTEMPTS: usize = 3;

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait SubscriptionRepoTrait: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionProfile>>;

    async fn get_by_gateway_subscription_id(
        &self,
        gateway_subscription_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>>;

    /// Lookup by the idempotency key of `subscription.created`.
    async fn get_by_gateway_key(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        gateway_subscription_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>>;

    /// Most recent active or trialing subscription.
    async fn get_current(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>>;

    /// Most recent subscription in any status.
    async fn get_latest(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>>;

    async fn create(&self, input: &CreateSubscriptionInput) -> AppResult<SubscriptionProfile>;

    /// Writes `state` only if the row still has `expected_version`.
    /// Returns `None` when another writer got there first.
    async fn update_if_version(
        &self,
        id: Uuid,
        expected_version: i32,
        state: &SubscriptionState,
    ) -> AppResult<Option<SubscriptionProfile>>;
}

#[async_trait]
pub trait ProductRepoTrait: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<ProductProfile>>;

    async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<ProductPlanProfile>>;
}

// ============================================================================
// Profile Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionProfile {
    pub id: Uuid,
    pub company_id: Uuid,
    pub product_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub plan: Option<String>,
    pub status: SubscriptionStatus,
    pub billing_cycle: Option<BillingCycle>,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub gateway: Option<Gateway>,
    pub gateway_subscription_id: Option<String>,
    pub monthly_amount: Option<f64>,
    pub version: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SubscriptionProfile {
    pub fn state(&self) -> SubscriptionState {
        SubscriptionState {
            plan_id: self.plan_id,
            plan: self.plan.clone(),
            status: self.status,
            billing_cycle: self.billing_cycle,
            monthly_amount: self.monthly_amount,
            current_period_start: self.current_period_start,
            current_period_end: self.current_period_end,
            canceled_at: self.canceled_at,
        }
    }

    pub fn to_summary(&self) -> SubscriptionSummary {
        SubscriptionSummary {
            id: self.id.to_string(),
            status: self.status.to_string(),
            plan_id: self.plan_id.map(|id| id.to_string()),
            plan: self.plan.clone(),
            billing_cycle: self.billing_cycle.map(|c| c.to_string()),
            gateway: self.gateway.map(|g| g.to_string()),
            monthly_amount: self.monthly_amount,
            current_period_start: self.current_period_start.map(|d| d.to_rfc3339()),
            current_period_end: self.current_period_end.map(|d| d.to_rfc3339()),
            canceled_at: self.canceled_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// The mutable part of a subscription row.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionState {
    pub plan_id: Option<Uuid>,
    pub plan: Option<String>,
    pub status: SubscriptionStatus,
    pub billing_cycle: Option<BillingCycle>,
    pub monthly_amount: Option<f64>,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionInput {
    pub company_id: Uuid,
    pub product_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub plan: Option<String>,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub gateway: Gateway,
    pub gateway_subscription_id: Option<String>,
    pub monthly_amount: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ProductProfile {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub trial_days: i32,
}

#[derive(Debug, Clone)]
pub struct ProductPlanProfile {
    pub id: Uuid,
    pub product_id: Uuid,
    pub slug: String,
    pub name: String,
}

/// Company/product pair a processed event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTarget {
    pub company_id: Uuid,
    pub product_id: Uuid,
}

/// Result reported back to the gateway. Failures are data, never HTTP errors.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip)]
    pub target: Option<NotificationTarget>,
}

impl ProcessOutcome {
    fn ok(message: impl Into<String>, target: Option<NotificationTarget>) -> Self {
        Self {
            success: true,
            message: message.into(),
            target,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            target: None,
        }
    }

    fn applied(message: impl Into<String>, subscription: &SubscriptionProfile) -> Self {
        Self::ok(
            message,
            Some(NotificationTarget {
                company_id: subscription.company_id,
                product_id: subscription.product_id,
            }),
        )
    }
}

/// Target named directly by the event, when both ids are UUIDs.
fn event_target(data: &BillingEventData) -> Option<NotificationTarget> {
    let company_id = Uuid::parse_str(data.company_id.as_deref()?).ok()?;
    let product_id = Uuid::parse_str(data.product_id.as_deref()?).ok()?;
    Some(NotificationTarget {
        company_id,
        product_id,
    })
}

// ============================================================================
// State Machine
// ============================================================================

/// A plan reference is either a plan row id or a raw plan code.
fn split_plan_ref(plan_ref: &str) -> (Option<Uuid>, Option<String>) {
    match Uuid::parse_str(plan_ref) {
        Ok(id) => (Some(id), None),
        Err(_) => (None, Some(plan_ref.to_string())),
    }
}

/// Computes the state after applying `kind` to `current`.
///
/// Returns `None` when the event leaves the row unchanged, so replays do not
/// bump the version.
pub fn next_state(
    current: &SubscriptionState,
    kind: BillingEventKind,
    data: &BillingEventData,
    now: DateTime<Utc>,
) -> Option<SubscriptionState> {
    let mut next = current.clone();

    match kind {
        BillingEventKind::SubscriptionUpdated => {
            if let Some(plan_ref) = data.plan_id.as_deref() {
                let (plan_id, plan) = split_plan_ref(plan_ref);
                if plan_id.is_some() {
                    next.plan_id = plan_id;
                } else {
                    next.plan = plan;
                }
            }
            if let Some(raw) = data.status.as_deref() {
                match SubscriptionStatus::from_str(raw) {
                    Ok(status) => next.status = status,
                    Err(_) => warn!(status = %raw, "Ignoring unknown subscription status"),
                }
            }
            if let Some(amount) = data.amount {
                next.monthly_amount = Some(amount);
            }
            if let Some(cycle) = data.billing_cycle {
                next.billing_cycle = Some(cycle);
            }
            if let Some(end) = data.current_period_end {
                next.current_period_end = Some(end);
            }
        }
        BillingEventKind::SubscriptionCanceled => {
            let previous = (current.status == SubscriptionStatus::Canceled)
                .then_some(current.canceled_at)
                .flatten();
            next.status = SubscriptionStatus::Canceled;
            next.canceled_at = Some(data.canceled_at.or(previous).unwrap_or(now));
        }
        BillingEventKind::SubscriptionRenewed => {
            next.status = SubscriptionStatus::Active;
            if let Some(start) = data.current_period_start {
                next.current_period_start = Some(start);
            }
            if let Some(end) = data.current_period_end {
                next.current_period_end = Some(end);
            }
        }
        BillingEventKind::PaymentSucceeded => {
            if current.status == SubscriptionStatus::PastDue {
                next.status = SubscriptionStatus::Active;
            }
        }
        BillingEventKind::PaymentFailed => {
            next.status = SubscriptionStatus::PastDue;
        }
        BillingEventKind::SubscriptionCreated | BillingEventKind::Unmapped => {}
    }

    (next != *current).then_some(next)
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct BillingUseCases {
    subscriptions: Arc<dyn SubscriptionRepoTrait>,
    products: Arc<dyn ProductRepoTrait>,
}

impl BillingUseCases {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepoTrait>,
        products: Arc<dyn ProductRepoTrait>,
    ) -> Self {
        Self {
            subscriptions,
            products,
        }
    }

    /// Applies a canonical event to subscription state.
    ///
    /// Never fails: database errors are logged and reported as an unsuccessful outcome.
    pub async fn process(&self, event: &NormalizedBillingEvent) -> ProcessOutcome {
        match self.process_inner(event).await {
            Ok(outcome) => {
                info!(
                    event_type = event.kind.as_str(),
                    gateway = %event.gateway,
                    success = outcome.success,
                    message = %outcome.message,
                    "Billing event processed"
                );
                outcome
            }
            Err(e) => {
                tracing::error!(
                    event_type = event.kind.as_str(),
                    gateway = %event.gateway,
                    error = %e,
                    "Billing event processing failed"
                );
                ProcessOutcome::failed("Failed to process billing event")
            }
        }
    }

    async fn process_inner(&self, event: &NormalizedBillingEvent) -> AppResult<ProcessOutcome> {
        let data = &event.data;

        match event.kind {
            BillingEventKind::SubscriptionCreated => self.create_subscription(event).await,
            BillingEventKind::SubscriptionUpdated
            | BillingEventKind::SubscriptionCanceled
            | BillingEventKind::SubscriptionRenewed => {
                let Some(reference) = data.subscription_id.as_deref() else {
                    return Ok(ProcessOutcome::failed(format!(
                        "{} requires subscription_id",
                        event.kind.as_str()
                    )));
                };
                match self.find_subscription(reference).await? {
                    Some(subscription) => self.apply_with_retry(subscription, event).await,
                    None => Ok(ProcessOutcome::failed(format!(
                        "Subscription {reference} not found"
                    ))),
                }
            }
            BillingEventKind::PaymentSucceeded | BillingEventKind::PaymentFailed => {
                let Some(reference) = data.subscription_id.as_deref() else {
                    return Ok(ProcessOutcome::ok(
                        "Payment without subscription; nothing to update",
                        event_target(data),
                    ));
                };
                match self.find_subscription(reference).await? {
                    Some(subscription) => self.apply_with_retry(subscription, event).await,
                    None => Ok(ProcessOutcome::failed(format!(
                        "Subscription {reference} not found"
                    ))),
                }
            }
            BillingEventKind::Unmapped => Ok(ProcessOutcome::ok("Event type not handled", None)),
        }
    }

    /// Resolves a subscription reference: row id first, then gateway id.
    async fn find_subscription(&self, reference: &str) -> AppResult<Option<SubscriptionProfile>> {
        if let Ok(id) = Uuid::parse_str(reference) {
            if let Some(subscription) = self.subscriptions.get_by_id(id).await? {
                return Ok(Some(subscription));
            }
        }
        self.subscriptions
            .get_by_gateway_subscription_id(reference)
            .await
    }

    async fn create_subscription(&self, event: &NormalizedBillingEvent) -> AppResult<ProcessOutcome> {
        let data = &event.data;
        let ids = (
            data.company_id.as_deref().map(Uuid::parse_str),
            data.product_id.as_deref().map(Uuid::parse_str),
        );
        let (company_id, product_id) = match ids {
            (Some(Ok(company_id)), Some(Ok(product_id))) => (company_id, product_id),
            (None, _) | (_, None) => {
                return Ok(ProcessOutcome::failed(
                    "subscription.created requires company_id and product_id",
                ));
            }
            _ => {
                return Ok(ProcessOutcome::failed(
                    "company_id and product_id must be UUIDs",
                ));
            }
        };
        let target = Some(NotificationTarget {
            company_id,
            product_id,
        });

        if let Some(gateway_subscription_id) = data.subscription_id.as_deref() {
            let existing = self
                .subscriptions
                .get_by_gateway_key(company_id, product_id, gateway_subscription_id)
                .await?;
            if existing.is_some() {
                info!(
                    %company_id,
                    %product_id,
                    gateway_subscription_id,
                    "Ignoring replayed subscription.created"
                );
                return Ok(ProcessOutcome::ok("Subscription already exists", target));
            }
        }

        let status = match data.status.as_deref().map(SubscriptionStatus::from_str) {
            Some(Ok(status)) => status,
            Some(Err(_)) | None => SubscriptionStatus::Active,
        };

        // At most one active/trialing row per company and product
        if status.is_current() {
            if let Some(current) = self.subscriptions.get_current(company_id, product_id).await? {
                if current.gateway_subscription_id == data.subscription_id {
                    info!(
                        %company_id,
                        %product_id,
                        subscription_id = %current.id,
                        "Ignoring replayed subscription.created"
                    );
                    return Ok(ProcessOutcome::ok("Subscription already exists", target));
                }
                warn!(
                    %company_id,
                    %product_id,
                    current_subscription_id = %current.id,
                    "subscription.created for a pair that already has a current subscription"
                );
                return Ok(ProcessOutcome::failed(format!(
                    "Company already has a current subscription {} for this product",
                    current.id
                )));
            }
        }

        let (plan_id, plan) = data
            .plan_id
            .as_deref()
            .map(split_plan_ref)
            .unwrap_or_default();

        let input = CreateSubscriptionInput {
            company_id,
            product_id,
            plan_id,
            plan,
            status,
            billing_cycle: data.billing_cycle.unwrap_or(BillingCycle::Monthly),
            current_period_start: data.current_period_start,
            current_period_end: data.current_period_end,
            gateway: event.gateway,
            gateway_subscription_id: data.subscription_id.clone(),
            monthly_amount: data.amount,
        };

        match self.subscriptions.create(&input).await {
            Ok(created) => Ok(ProcessOutcome::applied(
                format!("Subscription {} created", created.id),
                &created,
            )),
            // A concurrent delivery of the same event won the unique index
            Err(AppError::Conflict(_)) => {
                Ok(ProcessOutcome::ok("Subscription already exists", target))
            }
            Err(e) => Err(e),
        }
    }

    async fn apply_with_retry(
        &self,
        mut current: SubscriptionProfile,
        event: &NormalizedBillingEvent,
    ) -> AppResult<ProcessOutcome> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let Some(next) = next_state(&current.state(), event.kind, &event.data, Utc::now())
            else {
                return Ok(ProcessOutcome::applied("No changes needed", &current));
            };

            match self
                .subscriptions
                .update_if_version(current.id, current.version, &next)
                .await?
            {
                Some(updated) => {
                    return Ok(ProcessOutcome::applied(
                        format!("Subscription {} is now {}", updated.id, updated.status),
                        &updated,
                    ));
                }
                None => {
                    warn!(
                        subscription_id = %current.id,
                        attempt,
                        "Subscription changed concurrently, retrying"
                    );
                    current = self
                        .subscriptions
                        .get_by_id(current.id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Subscription disappeared".into()))?;
                }
            }
        }

        Ok(ProcessOutcome::failed(format!(
            "Subscription {} kept changing concurrently",
            current.id
        )))
    }

    /// Subscription state of a company for a product, with trial eligibility
    /// when there is no live subscription.
    pub async fn check_subscription(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<SubscriptionCheck> {
        if let Some(current) = self.subscriptions.get_current(company_id, product_id).await? {
            return Ok(SubscriptionCheck {
                has_subscription: true,
                subscription: Some(current.to_summary()),
                trial_available: None,
                trial_days: None,
            });
        }

        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
        let previous = self.subscriptions.get_latest(company_id, product_id).await?;

        Ok(SubscriptionCheck {
            has_subscription: false,
            trial_available: Some(previous.is_none() && product.trial_days > 0),
            trial_days: Some(product.trial_days),
            subscription: previous.map(|s| s.to_summary()),
        })
    }
}
