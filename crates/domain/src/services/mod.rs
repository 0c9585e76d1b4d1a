//! Business logic services for the visit lifecycle.

pub mod lifecycle;
pub mod notification;
pub mod ownership;
pub mod store;

pub use lifecycle::{LifecycleError, VisitLifecycle};
pub use notification::{
    ArrivalNotice, DecisionOutcome, MockVisitNotifier, NotificationResult, VisitNotifier,
};
pub use ownership::Actor;
pub use store::{HistoryFilter, HistoryPage, StoreError, VisitStore};
