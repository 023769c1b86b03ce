//! Initializes `tracing` from the logger section of the configuration.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config;

/// Crates whose events pass the default filter.
const MODULE_WHITELIST: &[&str] = &["ontograph", "tower_http"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

/// Where formatted events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Stdout,
    /// Keeps stdout clean for command output.
    Stderr,
}

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Builds the filter directive for `level`: every whitelisted module at that
/// level, everything else silent.
#[must_use]
pub fn filter_directive(config: &config::Logger) -> String {
    config.override_filter.clone().unwrap_or_else(|| {
        MODULE_WHITELIST
            .iter()
            .map(|module| format!("{module}={}", config.level))
            .collect::<Vec<_>>()
            .join(",")
    })
}

/// Installs the global subscriber once. Later calls are ignored.
///
/// `RUST_LOG`, when set, replaces the configured filter.
pub fn init(config: &config::Logger, output: Output) {
    if !config.enable || INITIALIZED.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(config)))
        .unwrap_or_else(|err| {
            eprintln!("invalid log filter, falling back to info: {err}");
            EnvFilter::new("info")
        });

    let layer = match (config.format, output) {
        (Format::Compact, Output::Stdout) => fmt::layer().compact().boxed(),
        (Format::Compact, Output::Stderr) => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
        (Format::Pretty, Output::Stdout) => fmt::layer().pretty().boxed(),
        (Format::Pretty, Output::Stderr) => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        (Format::Json, Output::Stdout) => fmt::layer().json().boxed(),
        (Format::Json, Output::Stderr) => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    if tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .is_ok()
    {
        let _ = INITIALIZED.set(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_whitelisted_modules() {
        let config = config::Logger {
            level: LogLevel::Debug,
            ..config::Logger::default()
        };
        assert_eq!(filter_directive(&config), "ontograph=debug,tower_http=debug");
    }

    #[test]
    fn override_replaces_directive() {
        let config = config::Logger {
            override_filter: Some("trace".to_string()),
            ..config::Logger::default()
        };
        assert_eq!(filter_directive(&config), "trace");
    }
}
