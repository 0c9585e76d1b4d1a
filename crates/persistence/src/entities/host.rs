//! Host entity for database operations.

use chrono::{DateTime, Utc};
use domain::models::{Host, Site};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for hosts.
#[derive(Debug, Clone, FromRow)]
pub struct HostEntity {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub site: Site,
    pub account_user_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<HostEntity> for Host {
    fn from(entity: HostEntity) -> Self {
        Host {
            id: entity.id,
            name: entity.name,
            company: entity.company,
            email: entity.email,
            phone: entity.phone,
            site: entity.site,
            account_user_id: entity.account_user_id,
            active: entity.active,
            created_at: entity.created_at,
            deleted_at: entity.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_entity_to_domain() {
        let now = Utc::now();
        let entity = HostEntity {
            id: Uuid::new_v4(),
            name: "Yousef Al-Kuwari".to_string(),
            company: Some("Facilities".to_string()),
            email: "yousef@example.com".to_string(),
            phone: Some("+974 4444 5555".to_string()),
            site: Site::MarinaFifty,
            account_user_id: Some(Uuid::new_v4()),
            active: true,
            created_at: now,
            deleted_at: None,
        };

        let host: Host = entity.clone().into();
        assert_eq!(host.id, entity.id);
        assert_eq!(host.site, Site::MarinaFifty);
        assert!(host.is_available());
    }
}
