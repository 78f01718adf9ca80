//! Partitioning of a prompt sequence into contiguous groups

use std::ops::Range;
use log::debug;

/// Ordered, contiguous groups covering `0..total`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan
{   pub groups: Vec<Range<usize>>
  , pub total: usize
}

impl BatchPlan
{   /// `batch_size` of 0 is treated as 1
    pub fn new(total: usize, batch_size: usize) -> Self
    {   let size = batch_size.max(1);
        let groups: Vec<Range<usize>>
          = (0..total)
            .step_by(size)
            .map(|start| start..(start + size).min(total))
            .collect();
        debug!(
          "Planned {} groups of up to {} for {} prompts",
          groups.len(), size, total
        );
        BatchPlan
        {   groups
          , total
        }
    }

    pub fn len(&self) -> usize
    {   self.groups.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.groups.is_empty()
    }

    pub fn is_last(&self, index: usize) -> bool
    {   index + 1 >= self.groups.len()
    }
}
