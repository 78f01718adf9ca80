//! Wire types for the chat completions endpoint

use serde::{Deserialize, Serialize};

// ===== Message Types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.into()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>
}

impl ChatRequest
{   /// Completion request for one prompt
    pub fn completion(
      prompt: &str
    , config: &crate::config::RequestConfig
    ) -> Self
    {   ChatRequest
        {   model: config.model.clone()
          , messages: vec![
              ChatMessage::user(combine_prompt(
                config.common_instructions.as_deref(),
                prompt
              ))
            ]
          , temperature: Some(config.temperature)
          , top_p: Some(1.0)
          , seed: config.seed
          , max_tokens: None
        }
    }

    /// Minimal request used to check a key
    pub fn probe(model: &str, max_tokens: usize) -> Self
    {   ChatRequest
        {   model: model.to_string()
          , messages: vec![ChatMessage::user("test")]
          , temperature: None
          , top_p: None
          , seed: None
          , max_tokens: Some(max_tokens)
        }
    }
}

/// Instructions first, newline, then the prompt.
/// Empty or missing instructions leave the prompt untouched.
pub fn combine_prompt(
  instructions: Option<&str>
, prompt: &str
) -> String
{   match instructions
    {   Some(i) if !i.is_empty() => format!("{}\n{}", i, prompt)
      , _ => prompt.to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
  , #[serde(default)]
    pub system_fingerprint: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ResponseMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub role: Option<String>
  , #[serde(default)]
    pub content: Option<String>
}

impl ChatResponse
{   /// Content of the first choice, if present and non-empty
    pub fn first_content(&self) -> Option<&str>
    {   self.choices.first()
          .and_then(|c| c.message.content.as_deref())
          .filter(|c| !c.is_empty())
    }
}
