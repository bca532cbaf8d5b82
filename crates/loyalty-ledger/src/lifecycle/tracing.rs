//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global subscriber once at startup. Levels come from
//! `RUST_LOG` (default `info`).
//!
//! ```bash
//! RUST_LOG=info loyalty-ledger -r http://localhost:8081      # Compact logs
//! RUST_LOG=debug loyalty-ledger -r http://localhost:8081     # Full payloads, every actor request
//! LOG_FORMAT=json loyalty-ledger -r http://localhost:8081    # One JSON object per line
//! ```
//!
//! The actors log every request with an `entity_type` field, so the compact format hides the
//! module path (`with_target(false)`):
//!
//! ```text
//! INFO Created entity_type="Order" size=1
//! INFO Accrual service rate limited, suspending polling number="12345678903" retry_after_secs=60
//! INFO settle: Order settled order_id=order_1 number="12345678903" accrual=500
//! ```

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line output with spans inline.
    Compact,
    /// Structured JSON for log collectors.
    Json,
}

pub fn setup_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false); // Don't show module paths - we use entity_type instead

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
