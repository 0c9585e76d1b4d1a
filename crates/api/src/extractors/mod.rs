//! Custom Axum extractors.
//!
//! Extractors authenticating the two caller populations: desk callers
//! (reception kiosk, checkpoint scanner) via API key, and host-portal
//! users via Bearer JWT.

pub mod desk_key;
pub mod user_auth;

pub use desk_key::DeskAuth;
pub use user_auth::UserAuth;
