//! Tracing-based structured logging initialization.
//!
//! Installs a `fmt` layer filtered by `RUST_LOG` (default `info`). Events
//! carry the usual per-connection fields; the console seat map is product
//! output and goes straight to stdout from the view task, not through the
//! subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
