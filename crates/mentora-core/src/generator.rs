//! Generator trait for mentora-core
//!
//! A `Generator` turns one `GenerationRequest` into one `GenerationResponse`.
//! Prompt construction, caching and parsing live above this layer; providers
//! only move bytes to and from the model API.

use crate::{GenerationRequest, GenerationResponse, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for calling a generation model
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run a single generation call
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;

    /// Optional method to get generator metadata
    fn metadata(&self) -> GeneratorMetadata {
        GeneratorMetadata::default()
    }
}

/// Metadata about a generator
#[derive(Debug, Clone, Default)]
pub struct GeneratorMetadata {
    /// Human-readable name of the generator
    pub name: Option<String>,
    /// Description of the backing provider
    pub description: Option<String>,
    /// Version information
    pub version: Option<String>,
    /// Supported capabilities, e.g. `json-output`, `image-output`
    pub capabilities: Vec<String>,
}

/// Arc-wrapped generator for thread-safe sharing
pub type SharedGenerator = Arc<dyn Generator>;

/// Extension trait for generators
pub trait GeneratorExt: Generator {
    /// Convert to a shared generator
    fn shared(self) -> SharedGenerator
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

impl<T: Generator> GeneratorExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoreError, GenerationOutput};

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
            if request.prompt.is_empty() {
                return Err(CoreError::InvalidRequest("empty prompt".to_string()));
            }
            Ok(GenerationResponse::text(request.id.clone(), request.prompt))
        }
    }

    #[tokio::test]
    async fn test_basic_generator() {
        let generator = EchoGenerator.shared();
        let request = GenerationRequest::text("test-model", "Hello, world!");
        let id = request.id.clone();
        let response = generator.generate(request).await.unwrap();
        assert_eq!(response.request_id, id);
        assert_eq!(response.as_text(), Some("Hello, world!"));
    }

    #[tokio::test]
    async fn test_generator_error() {
        let request = GenerationRequest::text("test-model", "");
        let result = EchoGenerator.generate(request).await;
        assert!(matches!(result, Err(CoreError::InvalidRequest(_))));
    }

    #[test]
    fn test_image_request_and_output() {
        let request = GenerationRequest::image("image-model", "a volcano diagram");
        assert!(request.wants_image);
        assert!(request.response_schema.is_none());

        let response = GenerationResponse {
            request_id: request.id,
            output: GenerationOutput::Image {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            },
        };
        assert!(response.as_text().is_none());
    }
}
