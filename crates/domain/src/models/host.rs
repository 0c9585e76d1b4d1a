//! Host domain model.
//!
//! Hosts are the employees visitors come to see. They are administered
//! outside the visit core; the lifecycle only reads them to validate that
//! a visit's host can receive visitors and to resolve portal users to the
//! host they act for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::site::Site;

/// Host domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Host {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// The host's own site, used to default pre-registration locations.
    pub site: Site,
    /// Portal user bound to this host, if an account exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_user_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Host {
    /// Whether the host may receive visitors: active and not soft-deleted.
    pub fn is_available(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Host {
        Host {
            id: Uuid::new_v4(),
            name: "Yousef Al-Kuwari".to_string(),
            company: Some("Facilities".to_string()),
            email: "yousef@example.com".to_string(),
            phone: None,
            site: Site::BarwaTowers,
            account_user_id: Some(Uuid::new_v4()),
            active: true,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_active_host_is_available() {
        assert!(host().is_available());
    }

    #[test]
    fn test_inactive_host_is_unavailable() {
        let mut h = host();
        h.active = false;
        assert!(!h.is_available());
    }

    #[test]
    fn test_soft_deleted_host_is_unavailable() {
        let mut h = host();
        h.deleted_at = Some(Utc::now());
        assert!(!h.is_available());
    }
}
