//! Shared types, errors, and configuration for Tabeeb.
//!
//! This crate provides common types used across all other crates:
//! - Credit kinds, payloads, and balance amounts
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - JWT claims validation for the identity provider's tokens
//! - Configuration management
//!
//! Error types live with the logic they describe, in the core crate's
//! modules; each exposes the error code and HTTP status the API layer maps
//! from.

pub mod auth;
pub mod config;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtError, JwtService};
