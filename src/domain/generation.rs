// src/domain/generation.rs
use crate::constants::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};
use serde::Serialize;

/// Parameters of one call to the generative model.
///
/// Built fresh for every call with the `with_*` builders; values are clamped
/// into their valid ranges so the request on the wire is always well formed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: Option<u32>,
    pub model: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            top_p: DEFAULT_TOP_P,
            top_k: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens.max(1);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p.clamp(0.0, 1.0);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_new_request_when_no_overrides_then_uses_defaults() {
        let request = GenerationRequest::new("hello");

        assert_eq!(request.prompt, "hello");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_output_tokens, 800);
        assert_eq!(request.top_p, 0.95);
        assert_eq!(request.top_k, None);
        assert_eq!(request.model, "gemini-2.0-flash");
    }

    #[test]
    fn given_out_of_range_values_when_building_then_clamps() {
        let request = GenerationRequest::new("x")
            .with_temperature(1.7)
            .with_top_p(-0.2)
            .with_max_output_tokens(0);

        assert_eq!(request.temperature, 1.0);
        assert_eq!(request.top_p, 0.0);
        assert_eq!(request.max_output_tokens, 1);
    }
}
