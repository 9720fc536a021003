//! Client-side components of the `aisle` seat-reservation service.
//!
//! ## Submodules
//!
//! - [`config`] - CLI/environment argument parsing and validated runtime
//!   configuration.
//! - [`picker`] - Seat sources: interactive stdin prompts or a randomized
//!   generator with think time.
//! - [`session`] - Connect-with-retry and the request/reply loop.
//! - [`telemetry`] - Tracing-based structured logging initialization.

pub mod config;
pub mod picker;
pub mod session;
pub mod telemetry;
