//! Tracing initialization.
//!
//! Logs always go to stderr because stdout carries the MCP protocol.
//! `RUST_LOG` selects what is logged; `RUSTDOC_IMPLS_LOG_FORMAT=json` switches
//! to one JSON object per line for log collectors.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Environment variable selecting the log line format.
pub const LOG_FORMAT_ENV: &str = "RUSTDOC_IMPLS_LOG_FORMAT";

static INIT: Once = Once::new();

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Initialize tracing. Safe to call multiple times.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let default_level = if is_test {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let filter = EnvFilter::from_default_env().add_directive(default_level.into());

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        let result = match (is_test, LogFormat::from_env()) {
            (true, _) => builder.with_test_writer().compact().try_init(),
            (false, LogFormat::Json) => builder.json().try_init(),
            (false, LogFormat::Compact) => builder.compact().try_init(),
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
