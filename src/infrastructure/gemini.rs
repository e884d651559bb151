// src/infrastructure/gemini.rs
use crate::application::{CredentialStore, TextGenerator};
use crate::constants::DEFAULT_BASE_URL;
use crate::domain::{GenerationError, GenerationRequest};
use crate::infrastructure::transport::{HttpResponse, HttpTransport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

/// `generateContent` response; every level is optional so a missing link is detectable
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the generative-language API.
///
/// The credential store is injected; it is read on every call and a missing
/// key fails before any network I/O.
pub struct GeminiClient<T: HttpTransport, C: CredentialStore> {
    transport: T,
    credentials: C,
    base_url: String,
}

impl<T: HttpTransport, C: CredentialStore> GeminiClient<T, C> {
    pub fn new(transport: T, credentials: C) -> Self {
        Self {
            transport,
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_key(&self) -> Result<String, GenerationError> {
        match self.credentials.api_key() {
            Ok(Some(key)) if !key.trim().is_empty() => Ok(key),
            Ok(_) => Err(GenerationError::missing_api_key()),
            Err(e) => Err(GenerationError::Auth(format!("could not read API key: {e}"))),
        }
    }

    /// One POST to `generateContent`; returns the text of the first candidate part
    #[instrument(level = "debug", skip_all, fields(model = %request.model, prompt_len = request.prompt.len()))]
    pub fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, request.model, key
        );
        let body = serde_json::to_value(request_body(request))
            .map_err(|e| GenerationError::Format(format!("could not encode request: {e}")))?;

        let response = self.transport.post_json(&url, &body)?;
        if !response.is_success() {
            let message = error_message(&response);
            warn!(status = response.status, %message, "Generation request failed");
            return Err(GenerationError::Network(message));
        }

        let text = extract_text(&response.body)?;
        info!(output_len = text.len(), "Received generated text");
        Ok(text)
    }

    /// Connectivity probe: GET the model list, success is HTTP 200
    #[instrument(level = "debug", skip_all)]
    pub fn test_connection(&self) -> Result<(), GenerationError> {
        let key = self.api_key()?;
        let response = self
            .transport
            .get(&format!("{}/v1beta/models?key={}", self.base_url, key))?;
        if response.status == 200 {
            info!("Connection test succeeded");
            Ok(())
        } else {
            Err(GenerationError::Network(error_message(&response)))
        }
    }
}

impl<T: HttpTransport, C: CredentialStore> TextGenerator for GeminiClient<T, C> {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        GeminiClient::generate(self, request)
    }
}

fn request_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: [RequestContent {
            parts: [RequestPart {
                text: &request.prompt,
            }],
        }],
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
            top_p: request.top_p,
            top_k: request.top_k,
        },
    }
}

/// Remote `error.message` when present, else a status based message
fn error_message(response: &HttpResponse) -> String {
    serde_json::from_str::<ErrorEnvelope>(&response.body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("API error: {}", response.status))
}

/// Walk candidates -> content -> parts -> text
fn extract_text(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "Response body is not the expected JSON");
        GenerationError::unexpected_shape()
    })?;

    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(GenerationError::unexpected_shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn given_request_without_top_k_when_encoding_then_omits_it() {
        let request = GenerationRequest::new("Hi").with_max_output_tokens(42);

        let body = serde_json::to_value(request_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("Hi"));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(42));
        assert!(body["generationConfig"].get("topK").is_none());
    }

    #[test]
    fn given_request_with_top_k_when_encoding_then_includes_it() {
        let request = GenerationRequest::new("Hi").with_top_k(40);

        let body = serde_json::to_value(request_body(&request)).unwrap();

        assert_eq!(body["generationConfig"]["topK"], json!(40));
    }

    #[rstest]
    #[case(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#, Some("ok"))]
    #[case(r#"{"candidates":[]}"#, None)]
    #[case(r#"{"candidates":[{"content":{"parts":[]}}]}"#, None)]
    #[case(r#"{"candidates":[{"content":{}}]}"#, None)]
    #[case(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#, None)]
    #[case(r#"{}"#, None)]
    #[case("not json", None)]
    fn given_body_when_extracting_text_then_validates_every_link(
        #[case] body: &str,
        #[case] expected: Option<&str>,
    ) {
        let result = extract_text(body);
        match expected {
            Some(text) => assert_eq!(result, Ok(text.to_string())),
            None => assert_eq!(result, Err(GenerationError::unexpected_shape())),
        }
    }

    #[rstest]
    #[case(r#"{"error":{"message":"quota exceeded"}}"#, "quota exceeded")]
    #[case(r#"{"error":{}}"#, "API error: 429")]
    #[case("<html>busy</html>", "API error: 429")]
    fn given_error_body_when_building_message_then_prefers_remote_message(
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let response = HttpResponse {
            status: 429,
            body: body.to_string(),
        };
        assert_eq!(error_message(&response), expected);
    }
}
