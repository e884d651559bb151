// src/util/testing.rs

use anyhow::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{CredentialStore, TextGenerator};
use crate::domain::{DomainError, GenerationError, GenerationRequest};
use crate::infrastructure::transport::{HttpResponse, HttpTransport};

/// Generation port double that replays scripted results in order
///
/// Every request is recorded. Once the script is exhausted further calls
/// fail with a `Network` error.
///
/// # Examples
///
/// ```
/// use studyaid::application::TextGenerator;
/// use studyaid::domain::GenerationRequest;
/// use studyaid::util::testing::ScriptedGenerator;
///
/// let generator = ScriptedGenerator::with_responses(vec![Ok("[]".to_string())]);
/// let text = generator.generate(&GenerationRequest::new("prompt")).unwrap();
///
/// assert_eq!(text, "[]");
/// assert_eq!(generator.requests()[0].prompt, "prompt");
/// ```
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: RefCell<VecDeque<Result<String, GenerationError>>>,
    requests: RefCell<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn with_responses(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Network("no scripted response".to_string())))
    }
}

/// One request seen by [`SpyTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

/// HTTP transport double: records every request and replays scripted responses
#[derive(Debug, Default)]
pub struct SpyTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, GenerationError>>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl SpyTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
        self
    }

    /// Queue a transport-level failure
    pub fn fail(self, error: GenerationError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn record(&self, method: &'static str, url: &str, body: Option<&serde_json::Value>) -> Result<HttpResponse, GenerationError> {
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Network("no scripted response".to_string())))
    }
}

impl HttpTransport for SpyTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, GenerationError> {
        self.record("POST", url, Some(body))
    }

    fn get(&self, url: &str) -> Result<HttpResponse, GenerationError> {
        self.record("GET", url, None)
    }
}

/// Credential store held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    key: Option<String>,
}

impl InMemoryCredentials {
    pub fn with_key(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentials {
    fn api_key(&self) -> Result<Option<String>, DomainError> {
        Ok(self.key.clone())
    }

    fn save_api_key(&mut self, key: &str) -> Result<(), DomainError> {
        self.key = Some(key.to_string());
        Ok(())
    }

    fn remove_api_key(&mut self) -> Result<(), DomainError> {
        self.key = None;
        Ok(())
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        init_test_setup().expect("Failed to initialize test setup");
    }

    #[test]
    fn given_scripted_responses_when_generating_then_replays_in_order() {
        let generator = ScriptedGenerator::with_responses(vec![
            Ok("first".to_string()),
            Err(GenerationError::missing_api_key()),
        ]);

        assert_eq!(generator.generate(&GenerationRequest::new("a")), Ok("first".to_string()));
        assert_eq!(
            generator.generate(&GenerationRequest::new("b")),
            Err(GenerationError::missing_api_key())
        );
        assert!(generator.generate(&GenerationRequest::new("c")).is_err());
        assert_eq!(generator.call_count(), 3);
        assert_eq!(generator.requests()[1].prompt, "b");
    }

    #[test]
    fn given_spy_when_posting_then_records_method_url_and_body() {
        let spy = SpyTransport::new().respond(200, "{}");
        let body = serde_json::json!({"a": 1});

        let response = spy.post_json("http://host/x", &body).unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            spy.requests(),
            vec![RecordedRequest {
                method: "POST",
                url: "http://host/x".to_string(),
                body: Some(body),
            }]
        );
    }

    #[test]
    fn given_in_memory_credentials_when_removing_then_key_is_gone() {
        let mut credentials = InMemoryCredentials::with_key("k");
        assert_eq!(credentials.api_key().unwrap(), Some("k".to_string()));

        credentials.remove_api_key().unwrap();

        assert_eq!(credentials.api_key().unwrap(), None);
    }
}
