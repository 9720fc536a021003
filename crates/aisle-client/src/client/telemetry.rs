//! Tracing-based structured logging initialization.
//!
//! The client talks to a human on stdout; diagnostics default to `warn`
//! so they never drown the prompts. Raise with `RUST_LOG` when debugging
//! the protocol exchange.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
