//! Per-invocation state, built once and handed to every step.

use tracing::debug;

use pagesmith_publisher::{CompletedTopics, IndexUpdater, MarkerIndexUpdater};
use pagesmith_shared::{AppConfig, Result, RunId, Secrets, resolve_secrets};

/// Everything a run needs: config, credentials, and the completed-topics record.
pub struct RunContext {
    pub run_id: RunId,
    pub config: AppConfig,
    pub secrets: Secrets,
    /// Loaded at start, appended to and saved by the publish step.
    pub topics: CompletedTopics,
    pub index_updater: Box<dyn IndexUpdater>,
}

impl RunContext {
    /// Resolve secrets from the environment and load the completed-topics record.
    pub fn prepare(config: AppConfig) -> Result<Self> {
        let secrets = resolve_secrets(&config)?;
        Self::with_secrets(config, secrets)
    }

    /// Build a context around already-resolved secrets.
    pub fn with_secrets(config: AppConfig, secrets: Secrets) -> Result<Self> {
        config.site.base_url()?;
        let topics = CompletedTopics::load(&config.site.completed_topics_file)?;
        let run_id = RunId::new();

        debug!(%run_id, completed = topics.len(), "run context ready");

        Ok(Self {
            run_id,
            config,
            secrets,
            topics,
            index_updater: Box::new(MarkerIndexUpdater),
        })
    }

    /// Swap the index editing strategy.
    pub fn with_index_updater(mut self, updater: impl IndexUpdater + 'static) -> Self {
        self.index_updater = Box::new(updater);
        self
    }
}
