use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{LlmError, LlmProvider, Message, Result};
use crate::config::{LlmSettings, OPENAI_API_KEY};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "no_stop")]
    stop: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

fn no_stop(stop: &&[&str]) -> bool {
    stop.is_empty()
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI Chat Completions client
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiProvider {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, messages: &[Message], stop: &[&str]) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey(OPENAI_API_KEY))?;

        let body = ChatRequest {
            model: &self.model,
            messages,
            stop,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "chat completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(LlmError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: String, api_key: Option<&str>) -> OpenAiProvider {
        OpenAiProvider::from_settings(&LlmSettings {
            base_url,
            api_key: api_key.map(String::from),
            ..LlmSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_from_settings_defaults() {
        let provider = OpenAiProvider::from_settings(&LlmSettings {
            api_key: Some("test_key".into()),
            ..LlmSettings::default()
        })
        .unwrap();
        assert_eq!(provider.api_key.as_deref(), Some("test_key"));
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(provider.model(), "gpt-4");
    }

    #[test]
    fn test_from_settings_trims_base_url() {
        let provider = OpenAiProvider::from_settings(&LlmSettings {
            base_url: "https://custom.openai.com/v1/".into(),
            model: "gpt-4-turbo".into(),
            ..LlmSettings::default()
        })
        .unwrap();
        assert_eq!(provider.endpoint(), "https://custom.openai.com/v1/chat/completions");
        assert_eq!(provider.model(), "gpt-4-turbo");
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::system("sys"), Message::user("hello")];
        let body = ChatRequest {
            model: "gpt-4",
            messages: &messages,
            stop: &[],
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert!(json.get("stop").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4",
                "stop": ["\nObservation:"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "Final Answer: ok" } }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider(mock_server.uri(), Some("sk-test"));
        let text = provider
            .complete(&[Message::user("hi")], &["\nObservation:"])
            .await
            .unwrap();
        assert_eq!(text, "Final Answer: ok");
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&mock_server)
            .await;

        let provider = provider(mock_server.uri(), Some("sk-test"));
        let err = provider.complete(&[Message::user("hi")], &[]).await.unwrap_err();
        match err {
            LlmError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&mock_server)
            .await;

        let provider = provider(mock_server.uri(), Some("sk-test"));
        let err = provider.complete(&[Message::user("hi")], &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = provider(mock_server.uri(), None);
        let err = provider.complete(&[Message::user("hi")], &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey("OPENAI_API_KEY")));
    }

    #[tokio::test]
    async fn test_complete_respects_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "choices": [{ "message": { "content": "Final Answer: late" } }]
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::from_settings(&LlmSettings {
            base_url: mock_server.uri(),
            api_key: Some("sk-test".into()),
            timeout_secs: 1,
            ..LlmSettings::default()
        })
        .unwrap();
        let err = provider.complete(&[Message::user("hi")], &[]).await.unwrap_err();
        match err {
            LlmError::Http(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
