//! Visit entity for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Site, Visit, VisitStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for visits.
#[derive(Debug, Clone, FromRow)]
pub struct VisitEntity {
    pub id: Uuid,
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
    pub rejection_reason: Option<String>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<VisitEntity> for Visit {
    fn from(entity: VisitEntity) -> Self {
        Visit {
            id: entity.id,
            session_token: entity.session_token,
            visitor_name: entity.visitor_name,
            visitor_company: entity.visitor_company,
            visitor_phone: entity.visitor_phone,
            visitor_email: entity.visitor_email,
            host_id: entity.host_id,
            purpose: entity.purpose,
            site: entity.site,
            status: entity.status,
            expected_date: entity.expected_date,
            pre_registered_by: entity.pre_registered_by,
            rejection_reason: entity.rejection_reason,
            check_in_at: entity.check_in_at,
            check_out_at: entity.check_out_at,
            approved_at: entity.approved_at,
            rejected_at: entity.rejected_at,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_entity_to_domain() {
        let now = Utc::now();
        let entity = VisitEntity {
            id: Uuid::new_v4(),
            session_token: "vst_abc123".to_string(),
            visitor_name: "Amira Haddad".to_string(),
            visitor_company: None,
            visitor_phone: None,
            visitor_email: Some("amira@acme.example".to_string()),
            host_id: Uuid::new_v4(),
            purpose: "Meeting".to_string(),
            site: Site::BarwaTowers,
            status: VisitStatus::CheckedIn,
            expected_date: None,
            pre_registered_by: None,
            rejection_reason: None,
            check_in_at: Some(now),
            check_out_at: None,
            approved_at: None,
            rejected_at: None,
            created_at: now,
        };

        let visit: Visit = entity.clone().into();
        assert_eq!(visit.id, entity.id);
        assert_eq!(visit.session_token, "vst_abc123");
        assert_eq!(visit.status, VisitStatus::CheckedIn);
        assert!(visit.is_on_site());
    }
}
