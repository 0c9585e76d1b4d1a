//! Shared utilities and common types for the Visitor Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token generation for visits
//! - Gate pass encoding/decoding for checkpoint scanners
//! - Cryptographic helpers (hashing, fingerprints)
//! - JWT utilities for the host portal identity layer
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod pass;
pub mod token;
pub mod validation;
