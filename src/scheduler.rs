//! Concurrent execution in paced groups

use futures::future::join_all;
use log::{debug, info};

use crate::completion::Complete;
use crate::config::RequestConfig;
use crate::pacing::Pacing;
use crate::plan::BatchPlan;
use crate::{progress_fraction, Answer, Progress};

/// Runs each group's calls concurrently, groups one after another.
///
/// No call of group k+1 starts before every call of group k has
/// settled and the pacing delay has elapsed.
#[derive(Debug, Clone)]
pub struct BatchScheduler
{   pub batch_size: usize
  , pub pacing: Pacing
}

impl BatchScheduler
{   pub fn new(batch_size: usize, pacing: Pacing) -> Self
    {   BatchScheduler
        {   batch_size: batch_size.max(1)
          , pacing
        }
    }

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
    {   let plan = BatchPlan::new(prompts.len(), self.batch_size);
        let mut results: Vec<Answer>
          = Vec::with_capacity(prompts.len());

        if plan.is_empty()
        {   on_progress(1.0);
            return results;
        }

        for (index, group) in plan.groups.iter().enumerate()
        {   debug!(
              "Dispatching group {}/{} ({} prompts)",
              index + 1, plan.len(), group.len()
            );
            let calls = prompts[group.clone()]
              .iter()
              .map(|prompt| client.complete(prompt, config));
            // join_all yields in input order, whatever finishes first
            let group_answers = join_all(calls).await;
            results.extend(group_answers);

            on_progress(progress_fraction(results.len(), plan.total));

            if !plan.is_last(index)
            {   self.pacing.pause().await;
            }
        }

        let failures = results.iter()
          .filter(|a| a.is_failure())
          .count();
        info!(
          "Batch run finished: {} prompts, {} failed",
          results.len(), failures
        );
        results
    }
}
