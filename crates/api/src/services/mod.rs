//! API-side service implementations.

pub mod notifier;

pub use notifier::LifecycleNotifier;
