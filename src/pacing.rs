//! Fixed pacing delay between groups or calls

use std::time::Duration;
use log::debug;

/// A pure delay; it does not react to throttling responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing
{   pub delay: Duration
}

impl Pacing
{   pub fn new(delay: Duration) -> Self
    {   Pacing { delay }
    }

    pub fn from_millis(ms: u64) -> Self
    {   Pacing::new(Duration::from_millis(ms))
    }

    /// Sleep for the configured delay; returns at once for zero
    pub async fn pause(&self)
    {   if self.delay.is_zero()
        {   return;
        }
        debug!("Pacing for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}
