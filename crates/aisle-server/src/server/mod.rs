//! Server-side components of the `aisle` seat-reservation service.
//!
//! This module contains the building blocks wired together in `main.rs`:
//!
//! ## Submodules
//!
//! - [`config`] - CLI/environment argument parsing and validated runtime
//!   configuration.
//! - [`dispatch`] - The accept loop: one handler task per connection,
//!   cooperative stop once the grid sells out, bounded drain.
//! - [`handler`] - The per-connection protocol state machine.
//! - [`telemetry`] - Tracing-based structured logging initialization.
//! - [`view`] - The best-effort console seat map.

pub mod config;
pub mod dispatch;
pub mod handler;
pub mod telemetry;
pub mod view;
