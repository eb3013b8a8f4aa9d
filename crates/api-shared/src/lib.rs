//! # API Shared
//!
//! Shared utilities and definitions for the triage APIs.
//!
//! Contains:
//! - Wire types (`wire` module) serialised by every transport
//! - Shared services like `HealthService`
//!
//! Used by `triage-core`, `api-rest` and the CLI for common functionality.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
