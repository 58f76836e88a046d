// src/provider/openai_compat.rs — Generic OpenAI-compatible provider
//
// Speaks the `/chat/completions` dialect used by OpenRouter, Groq, Together
// and friends. The verdict text is read from `choices[0].message.content`.

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider, Role, TokenUsage};
use crate::infra::config::ProviderConfig;
use crate::infra::errors::RubrixError;

/// Provider for any OpenAI-compatible API endpoint.
pub struct OpenAICompatProvider {
    id_str: String,
    name_str: String,
    api_key: String,
    base_url: String,
    referer: Option<String>,
    title: Option<String>,
    client: reqwest::Client,
}

impl OpenAICompatProvider {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        api_key: String,
        base_url: String,
    ) -> Self {
        Self {
            id_str: id.into(),
            name_str: name.into(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            referer: None,
            title: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build from the `[provider]` config section, including the
    /// OpenRouter attribution headers and the request timeout.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, RubrixError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("rubrix/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RubrixError::Config(format!("HTTP client: {e}")))?;

        let mut provider = Self::new(
            config.name.to_lowercase(),
            config.name.clone(),
            config.api_key.clone(),
            config.base_url.clone(),
        );
        provider.client = client;
        provider.referer = Some(config.referer.clone()).filter(|s| !s.is_empty());
        provider.title = Some(config.title.clone()).filter(|s| !s.is_empty());
        Ok(provider)
    }

    fn request_body(request: &ChatRequest) -> serde_json::Value {
        let mut msgs = Vec::new();
        if let Some(system) = &request.system {
            msgs.push(serde_json::json!({"role": Role::System.as_str(), "content": system}));
        }
        for m in &request.messages {
            msgs.push(serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            }));
        }

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": msgs,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }
}

#[async_trait]
impl ModelProvider for OpenAICompatProvider {
    fn id(&self) -> &str {
        &self.id_str
    }

    fn name(&self) -> &str {
        &self.name_str
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, RubrixError> {
        let body = Self::request_body(&request);

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(|e| RubrixError::Provider {
            provider: self.id_str.clone(),
            message: e.to_string(),
            retriable: e.is_timeout(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(RubrixError::Provider {
                provider: self.id_str.clone(),
                message: format!("HTTP {status}: {error_body}"),
                retriable: status.is_server_error(),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| RubrixError::Provider {
                provider: self.id_str.clone(),
                message: format!("Failed to parse completion: {e}"),
                retriable: false,
            })?;

        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| RubrixError::Provider {
                provider: self.id_str.clone(),
                message: "Completion has no choices[0].message.content".into(),
                retriable: false,
            })?
            .to_string();

        let tokens = |key: &str| {
            let n = resp["usage"][key].as_u64().unwrap_or(0);
            u32::try_from(n).unwrap_or(u32::MAX)
        };
        let usage = TokenUsage {
            input_tokens: tokens("prompt_tokens"),
            output_tokens: tokens("completion_tokens"),
        };

        Ok(ChatResponse { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatRequest {
        ChatRequest {
            model: "test-model".into(),
            messages: vec![Message::user("grade this")],
            max_tokens: Some(2000),
            temperature: Some(0.2),
            system: Some("JSON only".into()),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = OpenAICompatProvider::request_body(&request());
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "JSON only");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 2000);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 0.001);
    }

    #[test]
    fn test_request_body_without_optionals() {
        let body = OpenAICompatProvider::request_body(&ChatRequest {
            model: "m".into(),
            messages: vec![Message::user("x")],
            ..Default::default()
        });
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let p = OpenAICompatProvider::new("x", "X", "k".into(), "http://h/api/v1/".into());
        assert_eq!(p.base_url, "http://h/api/v1");
    }

    #[tokio::test]
    async fn test_chat_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("x-title", "RUBRIX Assignment Evaluator"))
            .and(body_partial_json(serde_json::json!({"model": "test-model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"overall_score\": 90}"}}],
                "usage": {"prompt_tokens": 120, "completion_tokens": 30}
            })))
            .mount(&server)
            .await;

        let config = ProviderConfig {
            api_key: "sk-test".into(),
            base_url: server.uri(),
            ..Default::default()
        };
        let provider = OpenAICompatProvider::from_config(&config).unwrap();
        let resp = provider.chat(request()).await.unwrap();
        assert_eq!(resp.content, "{\"overall_score\": 90}");
        assert_eq!(resp.usage.total(), 150);
    }

    #[tokio::test]
    async fn test_chat_huge_usage_saturates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "{}"}}],
                "usage": {"prompt_tokens": u64::MAX, "completion_tokens": 5_000_000_000u64}
            })))
            .mount(&server)
            .await;

        let provider = OpenAICompatProvider::new("openrouter", "OpenRouter", "k".into(), server.uri());
        let resp = provider.chat(request()).await.unwrap();
        assert_eq!(resp.usage.input_tokens, u32::MAX);
        assert_eq!(resp.usage.output_tokens, u32::MAX);
        assert_eq!(resp.usage.total(), u32::MAX);
    }

    #[tokio::test]
    async fn test_chat_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let provider = OpenAICompatProvider::new("openrouter", "OpenRouter", "bad".into(), server.uri());
        let err = provider.chat(request()).await.unwrap_err();
        assert!(matches!(err, RubrixError::Provider { retriable: false, .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_chat_missing_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let provider = OpenAICompatProvider::new("openrouter", "OpenRouter", "k".into(), server.uri());
        let err = provider.chat(request()).await.unwrap_err();
        assert!(err.to_string().contains("choices[0]"));
    }
}
