//! Completion client: one prompt in, one answer out

use std::future::Future;
use log::{debug, trace, error};
use reqwest::StatusCode;

use crate::config::RequestConfig;
use crate::error::Error;
use crate::request::{ChatRequest, ChatResponse};
use crate::{Answer, FINGERPRINT_UNAVAILABLE};

/// Anything that can turn a prompt into an answer.
///
/// Implementations absorb every failure into `Answer::failed()`.
pub trait Complete
{   fn complete(
      &self
    , prompt: &str
    , config: &RequestConfig
    ) -> impl Future<Output = Answer> + Send;
}

/// HTTP completion client over a shared connection pool
#[derive(Debug, Clone)]
pub struct CompletionClient
{   http_client: reqwest::Client
  , endpoint: String
  , capture_fingerprint: bool
}

impl CompletionClient
{   pub fn new(
      http_client: reqwest::Client
    , endpoint: impl Into<String>
    , capture_fingerprint: bool
    ) -> Self
    {   let endpoint = endpoint.into();
        debug!("Creating CompletionClient for {}", endpoint);
        CompletionClient
        {   http_client
          , endpoint
          , capture_fingerprint
        }
    }

    async fn handle_complete(
      &self
    , prompt: &str
    , config: &RequestConfig
    ) -> Result<Answer, Error>
    {   let request = ChatRequest::completion(prompt, config);
        debug!("Request payload: {:?}", request);

        let response = self.http_client
          .post(&self.endpoint)
          .bearer_auth(&config.api_key)
          .json(&request)
          .send()
          .await?;

        let status = response.status();
        trace!("Completion response status: {}", status);

        if status != StatusCode::OK
        {   let body = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            return Err(Error::ApiError
            {   status: status.as_u16()
              , body
            });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse
          = serde_json::from_str(&body)?;
        trace!("Response data: {:?}", chat_response);

        let content = chat_response.first_content()
          .ok_or(Error::NoChoicesInResponse)?;

        let answer = Answer::success(content);
        if self.capture_fingerprint
        {   let fingerprint = chat_response.system_fingerprint
              .as_deref()
              .unwrap_or(FINGERPRINT_UNAVAILABLE);
            Ok(answer.with_fingerprint(fingerprint))
        } else
        {   Ok(answer)
        }
    }
}

impl Complete for CompletionClient
{   async fn complete(
      &self
    , prompt: &str
    , config: &RequestConfig
    ) -> Answer
    {   match self.handle_complete(prompt, config).await
        {   Ok(answer) => answer
          , Err(e) => {
              error!("Completion failed: {}", e);
              Answer::failed()
            }
        }
    }
}
