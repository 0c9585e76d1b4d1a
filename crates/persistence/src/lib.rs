//! Persistence layer for the Visitor Manager backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations and the [`repositories::PgVisitStore`]
//!   implementation of the domain record-store interface

pub mod db;
pub mod entities;
mod metrics;
pub mod repositories;
