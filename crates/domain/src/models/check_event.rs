//! Check event audit records.
//!
//! One immutable row per physical check-in and check-out. Rows are appended
//! after the corresponding status commit and never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of a check event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "check_event_type", rename_all = "snake_case")]
pub enum CheckEventType {
    CheckIn,
    CheckOut,
}

impl std::fmt::Display for CheckEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckEventType::CheckIn => write!(f, "check_in"),
            CheckEventType::CheckOut => write!(f, "check_out"),
        }
    }
}

/// A committed check event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckEvent {
    pub id: i64,
    pub visit_id: Uuid,
    pub event_type: CheckEventType,
    /// The user who drove the scan; NULL for anonymous desk scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acting_user_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

/// Input for appending a check event.
#[derive(Debug, Clone)]
pub struct NewCheckEvent {
    pub visit_id: Uuid,
    pub event_type: CheckEventType,
    pub acting_user_id: Option<Uuid>,
}
