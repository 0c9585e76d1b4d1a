//! Check event entity for database operations.

use chrono::{DateTime, Utc};
use domain::models::{CheckEvent, CheckEventType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for check events.
#[derive(Debug, Clone, FromRow)]
pub struct CheckEventEntity {
    pub id: i64,
    pub visit_id: Uuid,
    pub event_type: CheckEventType,
    pub acting_user_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

impl From<CheckEventEntity> for CheckEvent {
    fn from(entity: CheckEventEntity) -> Self {
        CheckEvent {
            id: entity.id,
            visit_id: entity.visit_id,
            event_type: entity.event_type,
            acting_user_id: entity.acting_user_id,
            recorded_at: entity.recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_event_entity_to_domain() {
        let entity = CheckEventEntity {
            id: 42,
            visit_id: Uuid::new_v4(),
            event_type: CheckEventType::CheckIn,
            acting_user_id: None,
            recorded_at: Utc::now(),
        };

        let event: CheckEvent = entity.clone().into();
        assert_eq!(event.id, 42);
        assert_eq!(event.visit_id, entity.visit_id);
        assert_eq!(event.event_type, CheckEventType::CheckIn);
    }
}
