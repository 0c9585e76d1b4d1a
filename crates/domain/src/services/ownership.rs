//! Ownership checks gating host-side lifecycle actions.
//!
//! Approve and reject may only be called by the host a visit belongs to.
//! Desk callers (reception kiosk, checkpoint scanner) are valid identities
//! for creation and checkout but never own a visit.

use uuid::Uuid;

use crate::models::Visit;

/// The resolved acting identity behind a lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// Reception or checkpoint caller, authenticated but not host-bound.
    /// Carries a user id when the desk operator is signed in.
    Desk { user_id: Option<Uuid> },
    /// A host-portal user resolved to the host record they act for.
    HostUser { user_id: Uuid, host_id: Uuid },
}

impl Actor {
    /// Desk actor without an operator identity (anonymous kiosk/scanner).
    pub fn anonymous_desk() -> Self {
        Actor::Desk { user_id: None }
    }

    /// The acting user id, if one is known.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Actor::Desk { user_id } => *user_id,
            Actor::HostUser { user_id, .. } => Some(*user_id),
        }
    }

    /// The host this actor acts for, if any.
    pub fn host_id(&self) -> Option<Uuid> {
        match self {
            Actor::Desk { .. } => None,
            Actor::HostUser { host_id, .. } => Some(*host_id),
        }
    }

    /// Whether this actor is entitled to decide on the given visit.
    pub fn owns(&self, visit: &Visit) -> bool {
        self.host_id() == Some(visit.host_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Site, VisitStatus};
    use chrono::Utc;

    fn visit_for(host_id: Uuid) -> Visit {
        Visit {
            id: Uuid::new_v4(),
            session_token: "vst_test".to_string(),
            visitor_name: "Amira Haddad".to_string(),
            visitor_company: None,
            visitor_phone: None,
            visitor_email: None,
            host_id,
            purpose: "Meeting".to_string(),
            site: Site::BarwaTowers,
            status: VisitStatus::PendingApproval,
            expected_date: None,
            pre_registered_by: None,
            rejection_reason: None,
            check_in_at: None,
            check_out_at: None,
            approved_at: None,
            rejected_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_host_user_owns_own_visit() {
        let host_id = Uuid::new_v4();
        let actor = Actor::HostUser {
            user_id: Uuid::new_v4(),
            host_id,
        };
        assert!(actor.owns(&visit_for(host_id)));
    }

    #[test]
    fn test_host_user_does_not_own_foreign_visit() {
        let actor = Actor::HostUser {
            user_id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
        };
        assert!(!actor.owns(&visit_for(Uuid::new_v4())));
    }

    #[test]
    fn test_desk_actor_owns_nothing() {
        let host_id = Uuid::new_v4();
        assert!(!Actor::anonymous_desk().owns(&visit_for(host_id)));
        let signed_in = Actor::Desk {
            user_id: Some(Uuid::new_v4()),
        };
        assert!(!signed_in.owns(&visit_for(host_id)));
    }

    #[test]
    fn test_actor_accessors() {
        let user_id = Uuid::new_v4();
        let host_id = Uuid::new_v4();
        let actor = Actor::HostUser { user_id, host_id };
        assert_eq!(actor.user_id(), Some(user_id));
        assert_eq!(actor.host_id(), Some(host_id));
        assert_eq!(Actor::anonymous_desk().user_id(), None);
        assert_eq!(Actor::anonymous_desk().host_id(), None);
    }
}
