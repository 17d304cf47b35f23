//! # Voyamed Store
//!
//! Remote-store access layer for Voyamed.
//!
//! Contains:
//! - the [`TableBackend`] seam with HTTP and in-memory implementations
//! - the declarative [`Query`] model backends translate
//! - row types for the hosted collections
//! - per-entity repositories
//!
//! The layer is deliberately thin: no caching, no retry, no pagination.
//! Remote errors are logged and propagated verbatim.

#![warn(rust_2018_idioms)]

pub mod backend;
pub mod error;
pub mod http;
pub mod memory;
pub mod models;
pub mod query;
pub mod repositories;

pub use backend::TableBackend;
pub use error::{StoreError, StoreResult};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use models::*;
pub use query::{Direction, Filter, Query};
pub use repositories::{
    BookingsRepo, DestinationsRepo, JourneysRepo, MedicalHistoryRepo, SupportTicketsRepo,
    TreatmentsRepo,
};
