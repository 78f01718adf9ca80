//! Configuration for a batch run

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use log::debug;

pub const DEFAULT_API_BASE: &str
  = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-16k";

fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_temperature() -> f32 { 0.2 }
fn default_batch_size() -> usize { 5 }
fn default_group_delay_ms() -> u64 { 5000 }
fn default_sequential_delay_ms() -> u64 { 1000 }
fn default_api_base() -> String { DEFAULT_API_BASE.to_string() }
fn default_probe_max_tokens() -> usize { 16 }

/// Per-request settings, held unchanged for a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig
{   /// Model identifier sent with every completion
    #[serde(default = "default_model")]
    pub model: String
  , /// Sampling temperature in [0.0, 1.0]
    #[serde(default = "default_temperature")]
    pub temperature: f32
  , /// Seed for reproducible sampling
    #[serde(default)]
    pub seed: Option<i64>
  , /// Prefix prepended to every prompt
    #[serde(default)]
    pub common_instructions: Option<String>
  , /// Bearer token; never written back out
    #[serde(default, skip_serializing)]
    pub api_key: String
}

impl Default for RequestConfig
{   fn default() -> Self
    {   RequestConfig
        {   model: default_model()
          , temperature: default_temperature()
          , seed: None
          , common_instructions: None
          , api_key: String::new()
        }
    }
}

/// Execution strategy for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy
{   /// Concurrent groups with a pause between groups
    #[default]
    Concurrent
  , /// One call at a time with a pause after each
    Sequential
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig
{   #[serde(default)]
    pub request: RequestConfig
  , #[serde(default)]
    pub strategy: Strategy
  , /// Prompts per concurrent group
    #[serde(default = "default_batch_size")]
    pub batch_size: usize
  , /// Pause between concurrent groups in milliseconds
    #[serde(default = "default_group_delay_ms")]
    pub group_delay_ms: u64
  , /// Pause after each sequential call in milliseconds
    #[serde(default = "default_sequential_delay_ms")]
    pub sequential_delay_ms: u64
  , /// Record the system fingerprint with each answer
    #[serde(default)]
    pub capture_fingerprint: bool
  , /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String
  , /// Request timeout in seconds, transport default when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>
  , /// Model used for the key probe
    #[serde(default = "default_model")]
    pub probe_model: String
  , /// Output token cap for the key probe
    #[serde(default = "default_probe_max_tokens")]
    pub probe_max_tokens: usize
}

impl Default for EngineConfig
{   fn default() -> Self
    {   EngineConfig
        {   request: RequestConfig::default()
          , strategy: Strategy::default()
          , batch_size: default_batch_size()
          , group_delay_ms: default_group_delay_ms()
          , sequential_delay_ms: default_sequential_delay_ms()
          , capture_fingerprint: false
          , api_base: default_api_base()
          , timeout_secs: None
          , probe_model: default_model()
          , probe_max_tokens: default_probe_max_tokens()
        }
    }
}

impl EngineConfig
{   /// Load from a JSON string, filling omitted fields with defaults
    pub fn from_json_str(json: &str)
      -> Result<Self, crate::error::Error>
    {   let config: EngineConfig = serde_json::from_str(json)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              e.to_string()
            )
          })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading engine config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check ranges and required fields
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let t = self.request.temperature;
        if !(0.0..=1.0).contains(&t)
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("temperature {} outside [0.0, 1.0]", t)
            ));
        }
        if self.batch_size == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "batch_size must be at least 1".to_string()
            ));
        }
        if self.request.model.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "model must not be empty".to_string()
            ));
        }
        if self.api_base.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "api_base must not be empty".to_string()
            ));
        }
        if self.timeout_secs == Some(0)
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeout_secs must be at least 1".to_string()
            ));
        }
        Ok(())
    }

    /// Chat completions endpoint
    pub fn endpoint(&self) -> String
    {   format!(
          "{}/chat/completions",
          self.api_base.trim_end_matches('/')
        )
    }

    pub fn group_delay(&self) -> Duration
    {   Duration::from_millis(self.group_delay_ms)
    }

    pub fn sequential_delay(&self) -> Duration
    {   Duration::from_millis(self.sequential_delay_ms)
    }
}
