pub mod error;
pub mod config;
pub mod request;
pub mod completion;
pub mod validator;
pub mod plan;
pub mod pacing;
pub mod scheduler;
pub mod sequential;
pub mod engine;
pub mod input;
pub mod assemble;
use serde::{Deserialize, Serialize};

/*

promptbatch: fan a list of prompts out to a chat completions
endpoint and collect one answer per prompt, in prompt order.

  prompts + EngineConfig
      │
      ▼
  KeyValidator ── fails ──▶ Error::InvalidApiKey (nothing sent)
      │
      ▼
  BatchScheduler  (concurrent groups, pause between groups)
    or
  SequentialRunner (one call at a time, pause after each)
      │               both drive a CompletionClient
      ▼
  Vec<Answer>  (same length and order as the prompts)

*/

pub use config::{EngineConfig, RequestConfig, Strategy};
pub use completion::{Complete, CompletionClient};
pub use engine::{BatchEngine, RunHandle};
pub use error::Error;
pub use scheduler::BatchScheduler;
pub use sequential::SequentialRunner;
pub use validator::KeyValidator;

/// Fingerprint recorded when the service does not report one
pub const FINGERPRINT_UNAVAILABLE: &str = "unavailable";

/// One prompt's outcome.
///
/// `content` is `None` when the call failed; the slot is kept so the
/// answer sequence always lines up with the prompt sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Answer
{   pub content: Option<String>
  , /// Only set when fingerprint capture is enabled
    pub system_fingerprint: Option<String>
}

impl Answer
{   pub fn success(content: impl Into<String>) -> Self
    {   Answer
        {   content: Some(content.into())
          , system_fingerprint: None
        }
    }

    /// The failure marker
    pub fn failed() -> Self
    {   Answer::default()
    }

    pub fn with_fingerprint(
      mut self
    , fingerprint: impl Into<String>
    ) -> Self
    {   self.system_fingerprint = Some(fingerprint.into());
        self
    }

    pub fn is_failure(&self) -> bool
    {   self.content.is_none()
    }

    /// Answer text, empty for a failed call
    pub fn text(&self) -> &str
    {   self.content.as_deref().unwrap_or("")
    }
}

/// Progress fraction in [0.0, 1.0]
pub type Progress = f64;

/// Fraction of `done` over `total`, capped at 1.0.
/// An empty run counts as complete.
pub fn progress_fraction(done: usize, total: usize) -> Progress
{   if total == 0
    {   return 1.0;
    }
    (done as f64 / total as f64).min(1.0)
}
