//! # API Shared
//!
//! Shared utilities and definitions for Voyamed APIs.
//!
//! Contains:
//! - Shared services like `HealthService`
//! - Authentication utilities for admin-only operations
//!
//! Used by `api-rest` and the root binary for common functionality.

pub mod auth;
pub mod health;

pub use auth::{validate_api_key, AuthError};
pub use health::{HealthRes, HealthService};
