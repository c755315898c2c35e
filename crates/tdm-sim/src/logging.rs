//! Tracing subscriber setup for binaries built on this crate.
//!
//! Library code only emits events (`tracing::debug!` per scheduled tour,
//! `warn!` for fallbacks and dropped persons, `info!` for run summaries, and
//! one `person` span per simulated person).  Applications call
//! [`LoggingConfig::init`] once at startup to decide where they go.

use tracing::Level;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::{SimError, SimResult};

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub level:       Level,
    /// One JSON object per event instead of human-readable lines.
    pub json:        bool,
    pub ansi:        bool,
    /// Emit an event when each person span closes, with its busy time.
    pub span_events: bool,
    /// Filter directives, e.g. `"tdm_schedule=debug,info"`.  Overrides
    /// `RUST_LOG`.
    pub env_filter:  Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: Level::INFO, json: false, ansi: true, span_events: false, env_filter: None }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    pub fn with_span_events(mut self) -> Self {
        self.span_events = true;
        self
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Resolve the filter: explicit directives, then `RUST_LOG`, then
    /// `level`.
    pub fn filter(&self) -> SimResult<EnvFilter> {
        match &self.env_filter {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|e| SimError::Logging(e.to_string()))
            }
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))),
        }
    }

    /// Install the global subscriber.
    ///
    /// # Errors
    ///
    /// `SimError::Logging` for invalid filter directives or if a global
    /// subscriber is already installed.
    pub fn init(self) -> SimResult<()> {
        let filter = self.filter()?;
        let span_events = if self.span_events { FmtSpan::CLOSE } else { FmtSpan::NONE };
        let registry = Registry::default().with(filter);

        let result = if self.json {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(span_events);
            registry.with(layer).try_init()
        } else {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(self.ansi)
                .with_target(true)
                .with_span_events(span_events);
            registry.with(layer).try_init()
        };
        result.map_err(|e| SimError::Logging(e.to_string()))?;

        tracing::debug!(config = ?self, "logging initialised");
        Ok(())
    }
}
