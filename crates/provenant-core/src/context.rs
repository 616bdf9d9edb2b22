//! State shared by the steps of one report operation.

use provenant_config::{Config, HistoryCutoff};
use tracing::warn;

/// Settings and diagnostics passed explicitly to every reporting step.
///
/// Warnings recorded here never change the outcome of an operation; they
/// tell operators that a result was degraded (e.g. a truncated changelog).
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// How many times a failed ledger request is retried.
    pub max_api_retries: u32,

    /// Whether payloads are logged instead of sent.
    pub dry_run: bool,

    /// Changelog cutoff when no earlier artifact exists.
    pub cutoff: HistoryCutoff,

    /// Remote used to build the repository URL.
    pub remote: String,

    warnings: Vec<String>,
}

impl ReportContext {
    /// Creates a context from loaded configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            max_api_retries: config.ledger.max_api_retries,
            dry_run: false,
            cutoff: config.changelog.cutoff,
            remote: config.changelog.remote.clone(),
            warnings: Vec::new(),
        }
    }

    /// Sets the dry run flag.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the changelog cutoff.
    #[must_use]
    pub fn cutoff(mut self, cutoff: HistoryCutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Sets the remote used to build the repository URL.
    #[must_use]
    pub fn remote(mut self, name: impl Into<String>) -> Self {
        self.remote = name.into();
        self
    }

    /// Records a warning and logs it.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Returns the warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Default for ReportContext {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
