//! LLM chat-completion client.
//!
//! Talks to an Azure OpenAI-style deployment: POST a single-turn message
//! list to `{endpoint}/openai/deployments/{deployment}/chat/completions`
//! with an `api-key` header and read `choices[0].message.content`.
//! No retry, no streaming; the transport timeout is the only guard.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use semagent_shared::config::CompletionSettings;
use semagent_shared::{CompletionModel, Result, SemagentError};

/// REST client for the chat-completion service.
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: Url,
    deployment: String,
    api_key: String,
    api_version: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl ChatResponse {
    /// Text of the first generated message.
    fn first_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SemagentError::Completion("response contained no choices".into()))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl CompletionClient {
    /// Build a client from resolved settings.
    pub fn new(settings: &CompletionSettings) -> Result<Self> {
        let endpoint = Url::parse(&settings.endpoint)
            .map_err(|e| SemagentError::config(format!("invalid completion endpoint: {e}")))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("semagent/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SemagentError::Completion(format!("client build: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            deployment: settings.deployment.clone(),
            api_key: settings.api_key.clone(),
            api_version: settings.api_version.clone(),
        })
    }

    /// URL of the chat-completions operation for this deployment.
    fn completions_url(&self) -> Result<Url> {
        let mut url = self
            .endpoint
            .join(&format!(
                "openai/deployments/{}/chat/completions",
                self.deployment
            ))
            .map_err(|e| SemagentError::Completion(format!("completions URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

#[async_trait]
impl CompletionModel for CompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = self.completions_url()?;
        debug!(%url, prompt_len = prompt.len(), max_tokens, "requesting completion");

        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };

        let response = self
            .http
            .post(url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SemagentError::Completion(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SemagentError::Completion(format!("HTTP {status}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SemagentError::Completion(format!("response body: {e}")))?;

        parsed.first_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CompletionClient {
        CompletionClient::new(&CompletionSettings {
            endpoint: "https://example.openai.azure.com/".into(),
            api_key: "test-key".into(),
            deployment: "gpt-4o-mini".into(),
            api_version: "2024-02-15-preview".into(),
        })
        .expect("build client")
    }

    #[test]
    fn completions_url_includes_deployment_and_api_version() {
        let url = test_client().completions_url().expect("url");
        assert_eq!(
            url.as_str(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn request_is_single_turn_with_token_cap() {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "explique o conceito",
            }],
            max_tokens: 800,
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert_eq!(
            json,
            r#"{"messages":[{"role":"user","content":"explique o conceito"}],"max_tokens":800}"#
        );
    }

    #[test]
    fn first_choice_content_is_extracted() {
        let json = r#"{
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "resposta gerada"}},
                {"index": 1, "message": {"role": "assistant", "content": "alternativa"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.first_content().expect("content"), "resposta gerada");
    }

    #[test]
    fn empty_choices_is_a_completion_error() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).expect("deserialize");
        assert!(matches!(
            parsed.first_content(),
            Err(SemagentError::Completion(_))
        ));
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let result = CompletionClient::new(&CompletionSettings {
            endpoint: "::::".into(),
            api_key: "k".into(),
            deployment: "d".into(),
            api_version: "v".into(),
        });
        assert!(matches!(result, Err(SemagentError::Config { .. })));
    }
}
