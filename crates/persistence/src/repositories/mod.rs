//! Repository implementations for database operations.

pub mod check_event;
pub mod host;
pub mod store;
pub mod visit;

pub use check_event::CheckEventRepository;
pub use host::HostRepository;
pub use store::PgVisitStore;
pub use visit::VisitRepository;
