//! A [`Guide`] backed by the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{prompts, Guide, GuideError};
use crate::domain::{Config, ReflectionPayload, Verse};

/// HTTP client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client for `model` at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from the configuration, reading the API key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::MissingApiKey`] if the variable is unset or
    /// empty.
    pub fn from_config(config: &Config) -> Result<Self, GuideError> {
        let var = config.api_key_env();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GuideError::MissingApiKey(var.to_string()))?;
        Ok(Self::new(config.api_base(), config.model(), api_key))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, GuideError> {
        tracing::debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GuideError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response_text(&body)
    }
}

#[async_trait]
impl Guide for GeminiClient {
    async fn reflect(&self, entry_text: &str) -> Result<ReflectionPayload, GuideError> {
        let request = GenerateRequest::new(entry_text)
            .with_system_instruction(prompts::SYSTEM_INSTRUCTION)
            .with_json_schema(prompts::reflection_schema());
        let text = self.generate(&request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn title(&self, entry_text: &str) -> Result<String, GuideError> {
        let prompt = prompts::title(entry_text);
        self.generate(&GenerateRequest::new(&prompt)).await
    }

    async fn verse_of_the_day(&self) -> Result<Verse, GuideError> {
        let request = GenerateRequest::new(prompts::VERSE_OF_THE_DAY)
            .with_json_schema(prompts::verse_of_the_day_schema());
        let text = self.generate(&request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn faith_challenge(&self, last_entry_text: &str) -> Result<String, GuideError> {
        let prompt = prompts::faith_challenge(last_entry_text);
        self.generate(&GenerateRequest::new(&prompt)).await
    }

    async fn weekly_insight(&self, digest: &str) -> Result<String, GuideError> {
        let prompt = prompts::weekly_insight(digest);
        self.generate(&GenerateRequest::new(&prompt)).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

impl<'a> GenerateRequest<'a> {
    const fn new(prompt: &'a str) -> Self {
        Self {
            system_instruction: None,
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: prompt }],
            }],
            generation_config: None,
        }
    }

    const fn with_system_instruction(mut self, instruction: &'a str) -> Self {
        self.system_instruction = Some(Content {
            role: None,
            parts: [Part { text: instruction }],
        });
        self
    }

    fn with_json_schema(mut self, schema: Value) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        });
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Extract the text of the first candidate from a response body.
fn response_text(body: &str) -> Result<String, GuideError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(GuideError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_request_has_only_contents() {
        let request = GenerateRequest::new("olá");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "olá" }] }] })
        );
    }

    #[test]
    fn structured_request_carries_instruction_and_schema() {
        let request = GenerateRequest::new("texto")
            .with_system_instruction("sistema")
            .with_json_schema(prompts::reflection_schema());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sistema");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            value["generationConfig"]["responseSchema"]["properties"]["verse"]["required"],
            json!(["ref", "text"])
        );
    }

    #[test]
    fn extracts_first_candidate_text() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "  Caminho " }, { "text": "de paz\n" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        })
        .to_string();
        assert_eq!(response_text(&body).unwrap(), "Caminho de paz");
    }

    #[test]
    fn no_candidates_is_an_empty_response() {
        assert!(matches!(
            response_text(r#"{"candidates":[]}"#),
            Err(GuideError::EmptyResponse)
        ));
        assert!(matches!(
            response_text(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#),
            Err(GuideError::EmptyResponse)
        ));
    }

    #[test]
    fn non_json_body_is_malformed() {
        assert!(matches!(
            response_text("<html>"),
            Err(GuideError::Malformed(_))
        ));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("https://example.test/v1beta/", "gemini-2.5-flash", "k");
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn missing_key_is_reported() {
        let config: Config = toml::from_str(
            "_version = \"1\"\napi_key_env = \"LUMEN_TEST_KEY_THAT_IS_NEVER_SET\"\n",
        )
        .unwrap();
        let error = GeminiClient::from_config(&config).unwrap_err();
        assert!(matches!(error, GuideError::MissingApiKey(var) if var == "LUMEN_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
