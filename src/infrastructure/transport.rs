// src/infrastructure/transport.rs
use crate::domain::GenerationError;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, instrument};

/// Status and body of an HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP used by the Gemini client; swapped for a spy in tests
pub trait HttpTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, GenerationError>;

    fn get(&self, url: &str) -> Result<HttpResponse, GenerationError>;
}

impl<T: HttpTransport> HttpTransport for &T {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, GenerationError> {
        (**self).post_json(url, body)
    }

    fn get(&self, url: &str) -> Result<HttpResponse, GenerationError> {
        (**self).get(url)
    }
}

/// Blocking reqwest transport. No retries and no timeout beyond reqwest's default.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, GenerationError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GenerationError::Network(format!("HTTP client build failed: {e}")))?;
        Ok(Self { client })
    }

    fn read(response: reqwest::blocking::Response) -> Result<HttpResponse, GenerationError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GenerationError::Network(format!("Failed to read response body: {e}")))?;
        debug!(status, body_len = body.len(), "Received response");
        Ok(HttpResponse { status, body })
    }
}

/// Strip the query string so the API key never reaches the logs
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

impl HttpTransport for ReqwestTransport {
    #[instrument(level = "debug", skip_all, fields(url = redact(url)))]
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, GenerationError> {
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, concat!("studyaid/", env!("CARGO_PKG_VERSION")))
            .json(body)
            .send()
            .map_err(|e| GenerationError::Network(e.without_url().to_string()))?;
        Self::read(response)
    }

    #[instrument(level = "debug", skip_all, fields(url = redact(url)))]
    fn get(&self, url: &str) -> Result<HttpResponse, GenerationError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("studyaid/", env!("CARGO_PKG_VERSION")))
            .send()
            .map_err(|e| GenerationError::Network(e.without_url().to_string()))?;
        Self::read(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_url_with_key_when_redacting_then_drops_query() {
        assert_eq!(
            redact("https://host/v1beta/models?key=secret"),
            "https://host/v1beta/models"
        );
    }

    #[test]
    fn given_status_codes_when_checking_success_then_accepts_2xx_only() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let err = HttpResponse { status: 429, body: String::new() };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }
}
