//! Prompt/answer table for export

use std::io::Write;
use serde::{Deserialize, Serialize};
use log::debug;

use crate::error::Error;
use crate::Answer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow
{   pub prompt: String
  , /// Empty for a failed call
    pub answer: String
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>
}

/// Zip prompts with their answers, position by position
pub fn assemble(
  prompts: &[String]
, answers: &[Answer]
) -> Result<Vec<ResultRow>, Error>
{   if prompts.len() != answers.len()
    {   return Err(Error::LengthMismatch
        {   prompts: prompts.len()
          , answers: answers.len()
        });
    }
    Ok(prompts.iter()
      .zip(answers)
      .map(|(prompt, answer)| ResultRow
      {   prompt: prompt.clone()
        , answer: answer.text().to_string()
        , system_fingerprint: answer.system_fingerprint.clone()
      })
      .collect())
}

/// Pretty JSON array of rows
pub fn write_json<W: Write>(
  rows: &[ResultRow]
, mut writer: W
) -> Result<(), Error>
{   debug!("Writing {} rows", rows.len());
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
