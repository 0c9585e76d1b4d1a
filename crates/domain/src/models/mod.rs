//! Domain models for the Visitor Manager.

pub mod check_event;
pub mod host;
pub mod site;
pub mod visit;

pub use check_event::{CheckEvent, CheckEventType, NewCheckEvent};
pub use host::Host;
pub use site::Site;
pub use visit::{
    ActiveVisitsQuery, CheckpointRequest, CreateWalkInRequest, NewVisit, PageInfo,
    PreRegisterRequest, RejectRequest, Visit, VisitHistoryQuery, VisitHistoryResponse,
    VisitStatus, VisitSummary,
};
