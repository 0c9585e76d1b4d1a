//! Visit domain model, status enum and request/response types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::site::Site;

/// Visit lifecycle status.
///
/// Legal transitions:
/// `PendingApproval -> Approved | Rejected`, `Approved -> CheckedIn`,
/// `CheckedIn -> CheckedOut`. Walk-ins start directly at `CheckedIn`.
/// `Rejected` and `CheckedOut` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "visit_status", rename_all = "snake_case")]
pub enum VisitStatus {
    PendingApproval,
    Approved,
    Rejected,
    CheckedIn,
    CheckedOut,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::PendingApproval => "pending_approval",
            VisitStatus::Approved => "approved",
            VisitStatus::Rejected => "rejected",
            VisitStatus::CheckedIn => "checked_in",
            VisitStatus::CheckedOut => "checked_out",
        }
    }

    /// Whether no further transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VisitStatus::Rejected | VisitStatus::CheckedOut)
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visit domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Visit {
    pub id: Uuid,
    /// Globally unique, immutable once assigned.
    pub session_token: String,
    pub visitor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_email: Option<String>,
    pub host_id: Uuid,
    pub purpose: String,
    pub site: Site,
    pub status: VisitStatus,
    /// Set only for pre-registrations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    /// Portal user who pre-registered the visit, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_registered_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Visit {
    /// Whether the visitor is currently on site.
    pub fn is_on_site(&self) -> bool {
        self.status == VisitStatus::CheckedIn
    }
}

/// Input for inserting a visit row.
///
/// Built by the lifecycle only; callers never hand a status or token in.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub session_token: String,
    pub visitor_name: String,
    pub visitor_company: Option<String>,
    pub visitor_phone: Option<String>,
    pub visitor_email: Option<String>,
    pub host_id: Uuid,
    pub purpose: String,
    pub site: Site,
    pub status: VisitStatus,
    pub expected_date: Option<NaiveDate>,
    pub pre_registered_by: Option<Uuid>,
    pub check_in_at: Option<DateTime<Utc>>,
}

/// Request to create a walk-in visit at the reception desk.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateWalkInRequest {
    pub host_id: Uuid,
    #[validate(custom(function = "shared::validation::validate_visitor_name"))]
    pub visitor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_company: Option<String>,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_phone: Option<String>,
    #[validate(email(message = "visitor_email must be a valid email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_email: Option<String>,
    #[validate(custom(function = "shared::validation::validate_purpose"))]
    pub purpose: String,
    /// Free-text location from the kiosk; normalized to a canonical site.
    pub location: String,
}

/// Request to pre-register a visit from the host portal.
///
/// The host is taken from the acting identity, the site from the host's own
/// record.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct PreRegisterRequest {
    #[validate(custom(function = "shared::validation::validate_visitor_name"))]
    pub visitor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_company: Option<String>,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_phone: Option<String>,
    #[validate(email(message = "visitor_email must be a valid email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_email: Option<String>,
    #[validate(custom(function = "shared::validation::validate_purpose"))]
    pub purpose: String,
    #[validate(custom(function = "shared::validation::validate_expected_date"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
}

/// Request to reject a pending visit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RejectRequest {
    #[validate(length(max = 200, message = "reason must be at most 200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Request carrying whatever a checkpoint scanner read: an encoded gate
/// pass, a bare session token, or a URL containing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckpointRequest {
    pub pass: String,
}

/// Query parameters for the active-visits view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ActiveVisitsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Query parameters for visit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VisitHistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Response format for a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VisitSummary {
    pub id: Uuid,
    pub session_token: String,
    pub visitor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_email: Option<String>,
    pub host_id: Uuid,
    pub purpose: String,
    pub site: Site,
    pub status: VisitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Encoded gate pass; present on creation and token lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
}

impl VisitSummary {
    /// Attaches the encoded gate pass to the summary.
    pub fn with_pass(mut self, pass: String) -> Self {
        self.pass = Some(pass);
        self
    }
}

impl From<Visit> for VisitSummary {
    fn from(visit: Visit) -> Self {
        Self {
            id: visit.id,
            session_token: visit.session_token,
            visitor_name: visit.visitor_name,
            visitor_company: visit.visitor_company,
            visitor_phone: visit.visitor_phone,
            visitor_email: visit.visitor_email,
            host_id: visit.host_id,
            purpose: visit.purpose,
            site: visit.site,
            status: visit.status,
            expected_date: visit.expected_date,
            rejection_reason: visit.rejection_reason,
            check_in_at: visit.check_in_at,
            check_out_at: visit.check_out_at,
            approved_at: visit.approved_at,
            rejected_at: visit.rejected_at,
            created_at: visit.created_at,
            pass: None,
        }
    }
}

/// Pagination metadata for visit listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Response for the visit history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VisitHistoryResponse {
    pub data: Vec<VisitSummary>,
    pub pagination: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_in_request() -> CreateWalkInRequest {
        CreateWalkInRequest {
            host_id: Uuid::new_v4(),
            visitor_name: "Amira Haddad".to_string(),
            visitor_company: Some("Acme Logistics".to_string()),
            visitor_phone: Some("+974 4444 5555".to_string()),
            visitor_email: Some("amira@acme.example".to_string()),
            purpose: "Meeting".to_string(),
            location: "Barwa Towers".to_string(),
        }
    }

    #[test]
    fn test_status_terminality() {
        assert!(VisitStatus::Rejected.is_terminal());
        assert!(VisitStatus::CheckedOut.is_terminal());
        assert!(!VisitStatus::PendingApproval.is_terminal());
        assert!(!VisitStatus::Approved.is_terminal());
        assert!(!VisitStatus::CheckedIn.is_terminal());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&VisitStatus::PendingApproval).unwrap();
        assert_eq!(json, "\"pending_approval\"");
    }

    #[test]
    fn test_walk_in_request_valid() {
        assert!(walk_in_request().validate().is_ok());
    }

    #[test]
    fn test_walk_in_request_blank_name_rejected() {
        let mut req = walk_in_request();
        req.visitor_name = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_walk_in_request_bad_phone_rejected() {
        let mut req = walk_in_request();
        req.visitor_phone = Some("call me maybe".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_walk_in_request_bad_email_rejected() {
        let mut req = walk_in_request();
        req.visitor_email = Some("not-an-email".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_walk_in_request_optional_fields_may_be_absent() {
        let mut req = walk_in_request();
        req.visitor_company = None;
        req.visitor_phone = None;
        req.visitor_email = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_pre_register_request_past_date_rejected() {
        let req = PreRegisterRequest {
            visitor_name: "Amira Haddad".to_string(),
            visitor_company: None,
            visitor_phone: None,
            visitor_email: None,
            purpose: "Audit kickoff".to_string(),
            expected_date: Some(Utc::now().date_naive() - chrono::Duration::days(2)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_reject_request_long_reason_rejected() {
        let req = RejectRequest {
            reason: Some("x".repeat(300)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_summary_from_visit_carries_no_pass() {
        let visit = Visit {
            id: Uuid::new_v4(),
            session_token: "vst_test".to_string(),
            visitor_name: "Amira Haddad".to_string(),
            visitor_company: None,
            visitor_phone: None,
            visitor_email: None,
            host_id: Uuid::new_v4(),
            purpose: "Meeting".to_string(),
            site: Site::Element,
            status: VisitStatus::CheckedIn,
            expected_date: None,
            pre_registered_by: None,
            rejection_reason: None,
            check_in_at: Some(Utc::now()),
            check_out_at: None,
            approved_at: None,
            rejected_at: None,
            created_at: Utc::now(),
        };

        let summary = VisitSummary::from(visit.clone());
        assert_eq!(summary.id, visit.id);
        assert_eq!(summary.status, VisitStatus::CheckedIn);
        assert!(summary.pass.is_none());

        let with_pass = summary.with_pass("encoded".to_string());
        assert_eq!(with_pass.pass.as_deref(), Some("encoded"));
    }
}
