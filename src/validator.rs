//! Pre-flight API key check

use log::{debug, error, info};
use reqwest::StatusCode;

use crate::request::ChatRequest;

/// Sends one small billed request to confirm a key is accepted
#[derive(Debug, Clone)]
pub struct KeyValidator
{   http_client: reqwest::Client
  , endpoint: String
  , probe_model: String
  , probe_max_tokens: usize
}

impl KeyValidator
{   pub fn new(
      http_client: reqwest::Client
    , endpoint: impl Into<String>
    , probe_model: impl Into<String>
    , probe_max_tokens: usize
    ) -> Self
    {   KeyValidator
        {   http_client
          , endpoint: endpoint.into()
          , probe_model: probe_model.into()
          , probe_max_tokens
        }
    }

    /// Build from engine settings
    pub fn from_config(
      http_client: reqwest::Client
    , config: &crate::config::EngineConfig
    ) -> Self
    {   KeyValidator::new(
          http_client,
          config.endpoint(),
          config.probe_model.clone(),
          config.probe_max_tokens
        )
    }

    /// True iff the probe comes back with HTTP 200.
    /// An empty key is rejected without touching the network.
    pub async fn validate(&self, api_key: &str) -> bool
    {   if api_key.is_empty()
        {   debug!("Empty API key, skipping probe");
            return false;
        }

        let request = ChatRequest::probe(
          &self.probe_model,
          self.probe_max_tokens
        );

        match self.http_client
          .post(&self.endpoint)
          .bearer_auth(api_key)
          .json(&request)
          .send()
          .await
        {   Ok(response) => {
              let status = response.status();
              if status == StatusCode::OK
              {   info!("API key accepted");
                  true
              } else
              {   error!("API key probe rejected: {}", status);
                  false
              }
            }
          , Err(e) => {
              error!("API key probe failed: {}", e);
              false
            }
        }
    }
}
