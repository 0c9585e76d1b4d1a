//! Outbound notifications triggered by visit lifecycle events.
//!
//! Notifications are best-effort: the lifecycle dispatches them on a
//! spawned task, logs failures and never lets them affect the outcome of
//! the transition that triggered them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Host, Site};

/// Payload describing a visitor arrival, sent to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ArrivalNotice {
    pub visitor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_company: Option<String>,
    pub purpose: String,
    pub site: Site,
    pub checked_in_at: DateTime<Utc>,
}

/// Outcome of a host decision on a pre-registered visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved,
    Rejected,
}

impl std::fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionOutcome::Approved => write!(f, "approved"),
            DecisionOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// Result of a notification attempt.
#[derive(Debug, Clone)]
pub enum NotificationResult {
    /// All configured channels accepted the message.
    Sent,
    /// Dispatch was skipped (disabled, or no recipient address).
    Skipped,
    /// At least one channel failed (non-blocking).
    Failed(String),
}

/// Collaborator interface for outbound visit messaging.
#[async_trait::async_trait]
pub trait VisitNotifier: Send + Sync {
    /// Tell a host their visitor has arrived (email + chat where
    /// configured).
    async fn notify_host_of_arrival(
        &self,
        host: &Host,
        notice: &ArrivalNotice,
    ) -> NotificationResult;

    /// Tell a visitor how the host decided, by email.
    async fn notify_visitor_of_decision(
        &self,
        visitor_email: &str,
        outcome: DecisionOutcome,
        host_name: &str,
    ) -> NotificationResult;
}

/// Mock notifier for development and testing.
///
/// Logs what it would send without sending anything.
#[derive(Debug, Clone, Default)]
pub struct MockVisitNotifier {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockVisitNotifier {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    /// Create a mock notifier that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl VisitNotifier for MockVisitNotifier {
    async fn notify_host_of_arrival(
        &self,
        host: &Host,
        notice: &ArrivalNotice,
    ) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                host_id = %host.id,
                visitor = %notice.visitor_name,
                "Mock notifier simulating arrival notification failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            host_id = %host.id,
            host_email = %host.email,
            visitor = %notice.visitor_name,
            site = %notice.site,
            "Mock: would notify host of arrival"
        );

        NotificationResult::Sent
    }

    async fn notify_visitor_of_decision(
        &self,
        visitor_email: &str,
        outcome: DecisionOutcome,
        host_name: &str,
    ) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                visitor_email = %visitor_email,
                outcome = %outcome,
                "Mock notifier simulating decision notification failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            visitor_email = %visitor_email,
            outcome = %outcome,
            host = %host_name,
            "Mock: would notify visitor of decision"
        );

        NotificationResult::Sent
    }
}
