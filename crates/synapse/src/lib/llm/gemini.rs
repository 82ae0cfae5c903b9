use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{catalog::ModelDescriptor, error::Error, ModelInvoker};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    generation_config: GenerationConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Model returned no text (finish reason: {})", finish_reason_or_unknown(.finish_reason))]
    EmptyResponse { finish_reason: Option<String> },
}

fn finish_reason_or_unknown(reason: &Option<String>) -> &str {
    reason.as_deref().unwrap_or("unknown")
}

impl From<GeminiError> for Error {
    fn from(value: GeminiError) -> Self {
        let details = match &value {
            GeminiError::Request(e) => e.status().map(|s| s.to_string()),
            GeminiError::Api { status, .. } => Some(format!("HTTP status {status}")),
            GeminiError::EmptyResponse { finish_reason } => finish_reason.clone(),
        };

        Error::Model {
            message: value.to_string(),
            details,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 8192,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content; 1],
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Result<String, GeminiError> {
        let candidate = self.candidates.first();

        let text = candidate
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse {
                finish_reason: candidate.and_then(|c| c.finish_reason.clone()),
            });
        }

        Ok(text)
    }
}

/// Pulls `error.message` out of a Gemini error body, keeping the raw body
/// when it is not the usual envelope.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.into(),
            generation_config: GenerationConfig::default(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn send_generate_request(
        &self,
        api_key: &str,
        model_name: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: &self.generation_config,
        };

        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model_name))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = api_error_message(&resp.text().await.unwrap_or_default());
            return Err(GeminiError::Api { status, message });
        }

        Ok(resp.json::<GenerateContentResponse>().await?)
    }
}

impl ModelInvoker for GeminiClient {
    #[tracing::instrument(skip(self, prompt), fields(model = model.identifier, prompt_chars = prompt.len()))]
    async fn invoke(&self, prompt: &str, model: &ModelDescriptor) -> Result<String, Error> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("Google GenerativeAI API key is not set");
            return Err(Error::MissingCredential);
        };

        let response = self
            .send_generate_request(api_key, model.identifier, prompt)
            .await
            .and_then(|r| r.text())
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate content"))?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GEMINI_FLASH;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_request() {
        let client = GeminiClient::new(None).with_base_url("http://127.0.0.1:9");
        let err = client.invoke("prompt", &GEMINI_FLASH).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        assert!(!GeminiClient::new(Some("   ".into())).has_credential());
        assert!(GeminiClient::new(Some("key".into())).has_credential());
    }

    #[test]
    fn test_request_body_shape() {
        let config = GenerationConfig::default();
        let body = GenerateContentRequest {
            contents: [Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: "Hi".into(),
                }],
            }],
            generation_config: &config,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Hi"}]}],
                "generationConfig": {"maxOutputTokens": 8192, "temperature": 0.2}
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {
                    "content": {"role": "model", "parts": [{"text": "## Key"}, {"text": " Takeaways"}]},
                    "finishReason": "STOP"
                },
                {
                    "content": {"role": "model", "parts": [{"text": "ignored"}]}
                }
            ]
        }))
        .unwrap();

        assert_eq!(resp.text().unwrap(), "## Key Takeaways");
    }

    #[test]
    fn test_response_without_text_is_an_error() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();

        let err = resp.text().unwrap_err();
        assert!(matches!(
            &err,
            GeminiError::EmptyResponse { finish_reason: Some(r) } if r == "SAFETY"
        ));

        let err = Error::from(err);
        assert!(matches!(err, Error::Model { ref details, .. } if details.as_deref() == Some("SAFETY")));
    }

    #[test]
    fn test_api_error_message_is_extracted() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(api_error_message(body), "Resource has been exhausted");
        assert_eq!(api_error_message(" upstream timeout \n"), "upstream timeout");

        let err = Error::from(GeminiError::Api {
            status: 429,
            message: api_error_message(body),
        });
        assert_eq!(err.public_message(), "API error: 429 - Resource has been exhausted");
        assert_eq!(err.details().as_deref(), Some("HTTP status 429"));
    }
}
