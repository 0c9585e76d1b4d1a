//! Database entity definitions (row mappings).

pub mod check_event;
pub mod host;
pub mod visit;

pub use check_event::CheckEventEntity;
pub use host::HostEntity;
pub use visit::VisitEntity;
