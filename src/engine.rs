use std::time::Duration;
use tokio::sync::mpsc;
use log::{debug, error, info};

use crate::completion::CompletionClient;
use crate::config::{EngineConfig, Strategy};
use crate::error::Error;
use crate::pacing::Pacing;
use crate::scheduler::BatchScheduler;
use crate::sequential::SequentialRunner;
use crate::validator::KeyValidator;
use crate::{Answer, Progress};

const USER_AGENT: &str
  = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Drives one run: key gate, then the configured strategy
#[derive(Debug, Clone)]
pub struct BatchEngine
{   config: EngineConfig
}

impl BatchEngine
{   /// Create an engine, rejecting invalid configuration up front
    pub fn new(config: EngineConfig) -> Result<Self, Error>
    {   config.validate()?;
        debug!(
          "Creating BatchEngine: strategy {:?}, model {}",
          config.strategy, config.request.model
        );
        Ok(BatchEngine { config })
    }

    pub fn config(&self) -> &EngineConfig
    {   &self.config
    }

    /// One connection pool per run, dropped when the run ends
    fn build_http_client(&self) -> Result<reqwest::Client, Error>
    {   let mut builder = reqwest::Client::builder()
          .user_agent(USER_AGENT);
        if let Some(secs) = self.config.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::HttpError(e.to_string())
        })
    }

    /// Run every prompt and return one answer per prompt, in order.
    ///
    /// Fails only before any prompt is sent: missing key, rejected
    /// key, or an HTTP client that cannot be built. Per-prompt
    /// failures come back as `Answer::failed()` in their slot.
    pub async fn run<F>(
      &self
    , prompts: &[String]
    , on_progress: F
    ) -> Result<Vec<Answer>, Error>
    where
      F: FnMut(Progress)
    {   let request = &self.config.request;
        if request.api_key.is_empty()
        {   error!("No API key supplied");
            return Err(Error::MissingApiKey);
        }

        let http_client = self.build_http_client()?;

        let validator = KeyValidator::from_config(
          http_client.clone(),
          &self.config
        );
        if !validator.validate(&request.api_key).await
        {   return Err(Error::InvalidApiKey);
        }

        let client = CompletionClient::new(
          http_client,
          self.config.endpoint(),
          self.config.capture_fingerprint
        );

        info!(
          "Starting {:?} run over {} prompts",
          self.config.strategy, prompts.len()
        );
        let answers = match self.config.strategy
        {   Strategy::Concurrent => {
              BatchScheduler::new(
                self.config.batch_size,
                Pacing::new(self.config.group_delay())
              )
              .run(&client, prompts, request, on_progress)
              .await
            }
          , Strategy::Sequential => {
              SequentialRunner::new(
                Pacing::new(self.config.sequential_delay())
              )
              .run(&client, prompts, request, on_progress)
              .await
            }
        };

        debug_assert_eq!(answers.len(), prompts.len());
        Ok(answers)
    }

    /// Spawn the run on a background task - returns immediately
    pub fn spawn(self, prompts: Vec<String>) -> RunHandle
    {   debug!("Spawning run over {} prompts", prompts.len());
        let (progress_tx, progress_rx)
          = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
          self.run(&prompts, move |p| {
            let _ = progress_tx.send(p);
          }).await
        });

        RunHandle
        {   progress_rx
          , task
        }
    }
}

/// A run in flight
pub struct RunHandle
{   pub progress_rx: mpsc::UnboundedReceiver<Progress>
  , task: tokio::task::JoinHandle<Result<Vec<Answer>, Error>>
}

impl RunHandle
{   /// Wait for the run to end
    pub async fn finish(self) -> Result<Vec<Answer>, Error>
    {   self.task.await.map_err(|e| {
          error!("Run task failed: {}", e);
          Error::Other(format!("Run task failed: {}", e))
        })?
    }

    /// Next progress update, `None` once the run has ended
    pub async fn next_progress(&mut self) -> Option<Progress>
    {   self.progress_rx.recv().await
    }
}
