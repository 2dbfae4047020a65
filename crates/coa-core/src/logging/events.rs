//! Structured event definitions for logging.
//!
//! Every event carries the run id and the export stage it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Stages of a COA export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Snapshot and image loading.
    Load,
    /// Page and block assembly.
    Assemble,
    /// Row distribution without rendering.
    Paginate,
    /// HTML or JSON serialization.
    Render,
    /// Bounded wait for embedded images.
    WaitImages,
    /// Print trigger on the surface.
    Print,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Assemble => "assemble",
            Stage::Paginate => "paginate",
            Stage::Render => "render",
            Stage::WaitImages => "wait_images",
            Stage::Print => "print",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const SNAPSHOT_LOADED: &str = "snapshot.loaded";
    pub const SNAPSHOT_EMPTY: &str = "snapshot.empty";
    pub const SNAPSHOT_ERROR: &str = "snapshot.error";

    pub const DOCUMENT_ASSEMBLED: &str = "document.assembled";
    pub const DOCUMENT_WRITTEN: &str = "document.written";

    pub const EXPORT_IMAGES_SETTLED: &str = "export.images_settled";
    pub const EXPORT_IMAGES_TIMED_OUT: &str = "export.images_timed_out";
    pub const EXPORT_PRINTED: &str = "export.printed";
    pub const EXPORT_ERROR: &str = "export.error";

    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// A structured log event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub ts: DateTime<Utc>,
    pub level: Level,

    /// Event name (e.g., "run.started", "export.printed").
    pub event: String,

    /// Unique ID for this invocation of coa-core.
    pub run_id: String,

    /// Unit code once a snapshot has been loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<String>,

    pub stage: Stage,
    pub message: String,

    /// Additional structured fields (stable keys).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, serde_json::Value>,
}

impl LogEvent {
    pub fn new(
        level: Level,
        event: impl Into<String>,
        run_id: impl Into<String>,
        stage: Stage,
        message: impl Into<String>,
    ) -> Self {
        LogEvent {
            ts: Utc::now(),
            level,
            event: event.into(),
            run_id: run_id.into(),
            unit_code: None,
            stage,
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field to the event.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Serialize to a single JSON line.
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"serialization_failed","event":"{}"}}"#,
                self.event
            )
        })
    }
}

/// Context for generating log events with a consistent run id.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub unit_code: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            unit_code: None,
        }
    }

    /// Attach the unit code once the snapshot is known.
    pub fn with_unit_code(mut self, unit_code: impl Into<String>) -> Self {
        self.unit_code = Some(unit_code.into());
        self
    }

    /// Create an event with this context.
    pub fn event(
        &self,
        level: Level,
        event: impl Into<String>,
        stage: Stage,
        message: impl Into<String>,
    ) -> LogEvent {
        let mut e = LogEvent::new(level, event, &self.run_id, stage, message);
        e.unit_code = self.unit_code.clone();
        e
    }

    pub fn info(&self, event: impl Into<String>, stage: Stage, message: impl Into<String>) -> LogEvent {
        self.event(Level::Info, event, stage, message)
    }

    pub fn debug(&self, event: impl Into<String>, stage: Stage, message: impl Into<String>) -> LogEvent {
        self.event(Level::Debug, event, stage, message)
    }

    pub fn warn(&self, event: impl Into<String>, stage: Stage, message: impl Into<String>) -> LogEvent {
        self.event(Level::Warn, event, stage, message)
    }

    pub fn error(&self, event: impl Into<String>, stage: Stage, message: impl Into<String>) -> LogEvent {
        self.event(Level::Error, event, stage, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_serialization() {
        let event = LogEvent::new(
            Level::Info,
            "run.started",
            "run-12345",
            Stage::Init,
            "Starting export",
        )
        .with_field("config_id", "a1b2c3d4e5f6");

        let json = event.to_jsonl();
        assert!(json.contains(r#""event":"run.started""#));
        assert!(json.contains(r#""level":"info""#));
        assert!(json.contains(r#""stage":"init""#));
        assert!(json.contains(r#""run_id":"run-12345""#));
        assert!(json.contains(r#""config_id":"a1b2c3d4e5f6""#));
        assert!(!json.contains("unit_code"));
    }

    #[test]
    fn test_log_context_carries_unit() {
        let ctx = LogContext::new("run-abc").with_unit_code("MIC-7");
        let event = ctx.warn(
            event_names::EXPORT_IMAGES_TIMED_OUT,
            Stage::WaitImages,
            "Image wait timed out",
        );
        assert_eq!(event.run_id, "run-abc");
        assert_eq!(event.unit_code.as_deref(), Some("MIC-7"));
        assert_eq!(event.level, Level::Warn);
        assert!(event.to_jsonl().contains(r#""stage":"wait_images""#));
    }

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [Stage::Init, Stage::Load, Stage::Paginate, Stage::WaitImages, Stage::Print] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }
}
