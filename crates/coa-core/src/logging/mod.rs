//! Structured logging for coa-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSON lines for automated exports
//!
//! # Usage
//!
//! ```ignore
//! use coa_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//!
//! let config = LogConfig::from_cli(0, false, None);
//! init_logging(&config);
//!
//! let ctx = LogContext::new(generate_run_id()).with_unit_code("MIC-7");
//! log_event!(ctx, INFO, event_names::DOCUMENT_ASSEMBLED, Stage::Assemble, "Document assembled", pages = 3);
//! ```
//!
//! stdout is reserved for command payloads (HTML/JSON/MD output); all log
//! output goes to stderr.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat};
pub use events::{event_names, Level, LogContext, LogEvent, Stage};

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events pass the default filter.
const LOG_TARGETS: [&str; 4] = ["coa_core", "coa_report", "coa_config", "coa_common"];

/// Default filter directive for a level, e.g. `coa_core=info,coa_report=info,...`.
pub fn default_directive(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. `RUST_LOG`
/// replaces the default filter when set.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.level)));

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .init();
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("run-{}", &uuid.simple().to_string()[..12])
}

/// Structured event logging with context.
///
/// Usage:
/// ```ignore
/// log_event!(ctx, INFO, "export.printed", Stage::Print, "Print triggered");
/// log_event!(ctx, DEBUG, "document.assembled", Stage::Assemble, "Assembled",
///     pages = 4, images = 2);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, INFO, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::info!(
            event = $event,
            run_id = %$ctx.run_id,
            unit_code = ?$ctx.unit_code,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
    ($ctx:expr, DEBUG, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::debug!(
            event = $event,
            run_id = %$ctx.run_id,
            unit_code = ?$ctx.unit_code,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
    ($ctx:expr, WARN, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::warn!(
            event = $event,
            run_id = %$ctx.run_id,
            unit_code = ?$ctx.unit_code,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
    ($ctx:expr, ERROR, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::error!(
            event = $event,
            run_id = %$ctx.run_id,
            unit_code = ?$ctx.unit_code,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_ne!(id1, id2);
        // run-<12 hex chars>
        assert_eq!(id1.len(), 16);
        assert!(id1[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_default_directive() {
        let directive = default_directive(LevelFilter::DEBUG);
        assert!(directive.starts_with("coa_core=debug,"));
        assert!(directive.contains("coa_report=debug"));
        assert_eq!(directive.split(',').count(), 4);
    }

    #[test]
    fn test_log_event_macro_expands() {
        let ctx = LogContext::new("run-test").with_unit_code("MIC-1");
        log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "Starting");
        log_event!(ctx, DEBUG, event_names::DOCUMENT_ASSEMBLED, Stage::Assemble, "Assembled", pages = 2);
        log_event!(ctx, WARN, event_names::EXPORT_IMAGES_TIMED_OUT, Stage::WaitImages, "Timed out");
        log_event!(ctx, ERROR, event_names::INTERNAL_ERROR, Stage::Render, "Failed", code = 20);
    }
}
