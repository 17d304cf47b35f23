//! # Voyamed Core
//!
//! Domain services for the Voyamed booking platform:
//!
//! - the sixteen-stage journey machine ([`stages`])
//! - the per-login journey service and session ([`journey`])
//! - debounced dual catalog search ([`search`])
//! - startup configuration ([`config`])
//!
//! This crate contains **only** domain logic — no HTTP servers, routing,
//! or CLI concerns. Those live in `api-rest` and `cli`.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod journey;
pub mod search;
pub mod stages;

pub use config::{CoreConfig, DEFAULT_SEARCH_DEBOUNCE};
pub use error::{CoreError, CoreResult};
pub use journey::{JourneyError, JourneyResult, JourneyService, JourneySession, JourneyState};
pub use search::{SearchCoordinator, SearchResults, SearchService};
pub use stages::{JourneyStage, UnknownStage, ALL_STAGES, TOTAL_STEPS};
