//! Logging configuration.
//!
//! Level comes from `-v`/`-q`, then `COA_LOG`, then defaults to `warn`; the
//! format from `--log-format`, then `COA_LOG_FORMAT`. A set `RUST_LOG`
//! replaces the resulting filter wholesale (see [`super::init_logging`]).

use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Console lines, colored on a terminal.
    #[default]
    Human,
    /// One JSON object per line.
    #[value(alias = "json")]
    Jsonl,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Option<Self> {
        <LogFormat as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

/// Stderr logging settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LevelFilter,
    /// Human lines carry timestamps only at debug verbosity or finer.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::resolve(0, false, None, None, None)
    }
}

impl LogConfig {
    /// Settings from the global CLI flags and the `COA_LOG*` variables.
    pub fn from_cli(verbose: u8, quiet: bool, format: Option<LogFormat>) -> Self {
        let env_level = std::env::var("COA_LOG").ok();
        let env_format = std::env::var("COA_LOG_FORMAT").ok();
        Self::resolve(
            verbose,
            quiet,
            format,
            env_level.as_deref(),
            env_format.as_deref(),
        )
    }

    fn resolve(
        verbose: u8,
        quiet: bool,
        format: Option<LogFormat>,
        env_level: Option<&str>,
        env_format: Option<&str>,
    ) -> Self {
        let level = if quiet {
            LevelFilter::ERROR
        } else {
            match verbose {
                0 => env_level
                    .and_then(|v| v.trim().parse::<LevelFilter>().ok())
                    .unwrap_or(LevelFilter::WARN),
                1 => LevelFilter::INFO,
                2 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
        };
        let format = format
            .or_else(|| env_format.and_then(LogFormat::from_env_value))
            .unwrap_or_default();

        LogConfig {
            format,
            level,
            timestamps: level >= LevelFilter::DEBUG,
        }
    }
}
