//! Google Gemini provider.
//!
//! Speaks the REST surface directly: every reply goes through
//! `:streamGenerateContent?alt=sse` and is consumed as SSE `data:` blocks.
//!
//! Authentication priority:
//! 1. Explicit API key passed in (normally from the config file)
//! 2. `GEMINI_API_KEY` environment variable
//! 3. `GOOGLE_API_KEY` environment variable

use crate::error::StreamError;
use crate::llm::sse::{SseBuffer, parse_data_lines};
use crate::llm::streaming::{ProviderStream, StreamEvent};
use crate::llm::traits::Provider;
use crate::llm::types::{ChatMessage, MessageRole};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;

mod types;
use types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    SafetySetting,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const MAX_OUTPUT_TOKENS: u32 = 2048;
const TOP_P: f64 = 1.0;
const TOP_K: u32 = 1;

// Permissive blocking thresholds, sent with every request.
const SAFETY_SETTINGS: [(&str, &str); 4] = [
    ("HARM_CATEGORY_HARASSMENT", "BLOCK_NONE"),
    ("HARM_CATEGORY_HATE_SPEECH", "BLOCK_NONE"),
    ("HARM_CATEGORY_SEXUALLY_EXPLICIT", "BLOCK_NONE"),
    ("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_NONE"),
];

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(api_key, None)
    }

    pub fn with_base_url(api_key: Option<&str>, base_url: Option<&str>) -> Self {
        let resolved_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok());

        Self {
            api_key: resolved_key,
            base_url: base_url
                .map_or(DEFAULT_BASE_URL, |url| url.trim_end_matches('/'))
                .to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(std::time::Duration::from_secs(90))
                .tcp_keepalive(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Authentication source description for diagnostics.
    pub fn auth_source(config_key: Option<&str>) -> &'static str {
        if std::env::var("GEMINI_API_KEY").is_ok() {
            return "GEMINI_API_KEY env var";
        }
        if std::env::var("GOOGLE_API_KEY").is_ok() {
            return "GOOGLE_API_KEY env var";
        }
        if config_key.is_some() { "config" } else { "none" }
    }

    fn api_key(&self) -> Result<&str, StreamError> {
        self.api_key.as_deref().ok_or(StreamError::MissingApiKey)
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    /// The key rides in the URL query string, so any transport error message
    /// may embed it. Strip it before the message leaves this module.
    fn redact(&self, message: &str) -> String {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => message.replace(key, "[REDACTED]"),
            _ => message.to_string(),
        }
    }

    fn build_request(messages: &[ChatMessage], temperature: f64) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: messages
                .iter()
                .map(|message| Content {
                    role: match message.role {
                        MessageRole::Assistant => "model",
                        MessageRole::User => "user",
                    }
                    .to_string(),
                    parts: vec![Part {
                        text: message.text.clone(),
                    }],
                })
                .collect(),
            safety_settings: SAFETY_SETTINGS
                .iter()
                .map(|&(category, threshold)| SafetySetting {
                    category,
                    threshold,
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    async fn send_api_request(
        &self,
        url: String,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, StreamError> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|error| StreamError::request(self.redact(&error.to_string())))?;
        self.ensure_success_status(response).await
    }

    async fn ensure_success_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StreamError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GenerateContentResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .map_or(body, |error| error.message);
            return Err(StreamError::Api {
                provider: "gemini".to_string(),
                status: status.as_u16(),
                message: self.redact(message.trim()),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> Result<ProviderStream, StreamError> {
        let request = Self::build_request(messages, temperature);
        let api_key = self.api_key()?;
        let model_name = Self::model_name(model);
        let url = format!(
            "{}/v1beta/{model_name}:streamGenerateContent?key={api_key}&alt=sse",
            self.base_url
        );

        let response = self.send_api_request(url, &request).await?;
        let mut byte_stream = response.bytes_stream();
        let redact_key = self.api_key.clone();

        let stream = async_stream::try_stream! {
            let mut sse_buffer = SseBuffer::new();
            let mut sent_start = false;

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = chunk_result.map_err(|error| {
                    let mut message = error.to_string();
                    if let Some(key) = redact_key.as_deref() {
                        message = message.replace(key, "[REDACTED]");
                    }
                    StreamError::Interrupted(message)
                })?;
                sse_buffer.push_chunk(&chunk);

                while let Some(event_block) = sse_buffer.next_event_block() {
                    for data in parse_data_lines(&event_block) {
                        let Ok(gen_response) = serde_json::from_str::<GenerateContentResponse>(data) else {
                            continue;
                        };

                        if let Some(error) = gen_response.error.as_ref() {
                            Err(StreamError::Interrupted(format!(
                                "gemini API error: {}",
                                error.message
                            )))?;
                        }

                        if !sent_start {
                            yield StreamEvent::ResponseStart {
                                model: gen_response.model_version.clone(),
                            };
                            sent_start = true;
                        }

                        if let Some(candidates) = &gen_response.candidates {
                            for candidate in candidates {
                                for part in &candidate.content.parts {
                                    if let Some(delta_text) = &part.text
                                        && !delta_text.is_empty()
                                    {
                                        yield StreamEvent::TextDelta {
                                            text: delta_text.clone(),
                                        };
                                    }
                                }

                                if candidate.finish_reason.is_some() {
                                    let (input_tokens, output_tokens) = gen_response
                                        .usage_metadata
                                        .as_ref()
                                        .map_or((None, None), |usage| {
                                            (
                                                Some(usage.prompt_token_count),
                                                Some(usage.candidates_token_count),
                                            )
                                        });

                                    yield StreamEvent::Done {
                                        input_tokens,
                                        output_tokens,
                                    };
                                }
                            }
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
