//! One call at a time with a fixed pause after each

use log::{debug, info};

use crate::completion::Complete;
use crate::config::RequestConfig;
use crate::pacing::Pacing;
use crate::{progress_fraction, Answer, Progress};

#[derive(Debug, Clone)]
pub struct SequentialRunner
{   pub pacing: Pacing
}

impl SequentialRunner
{   pub fn new(pacing: Pacing) -> Self
    {   SequentialRunner { pacing }
    }

    /// Pauses after every call, the last one included
    pub async fn run<C, F>(
      &self
    , client: &C
    , prompts: &[String]
    , config: &RequestConfig
    , mut on_progress: F
    ) -> Vec<Answer>
    where
      C: Complete
    , F: FnMut(Progress)
    {   let total = prompts.len();
        let mut results: Vec<Answer> = Vec::with_capacity(total);

        if total == 0
        {   on_progress(1.0);
            return results;
        }

        for (index, prompt) in prompts.iter().enumerate()
        {   debug!("Sending prompt {}/{}", index + 1, total);
            let answer = client.complete(prompt, config).await;
            results.push(answer);
            on_progress(progress_fraction(index + 1, total));
            self.pacing.pause().await;
        }

        let failures = results.iter()
          .filter(|a| a.is_failure())
          .count();
        info!(
          "Sequential run finished: {} prompts, {} failed",
          total, failures
        );
        results
    }
}
