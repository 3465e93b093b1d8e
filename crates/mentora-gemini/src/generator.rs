use async_trait::async_trait;
use mentora_core::{
    GenerationRequest, GenerationResponse, Generator, GeneratorMetadata, Result as CoreResult,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use crate::GeminiError;
use crate::wire::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Generator backed by the Gemini `generateContent` endpoint
///
/// Cheap to clone; `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_base_url: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(
        api_base_url: &str,
        api_key: &str,
        timeout_seconds: u64,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| GeminiError::Client(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, model)
    }

    async fn call(&self, request: &GenerationRequest) -> Result<GenerateContentResponse, GeminiError> {
        let body = GenerateContentRequest::from(request);
        debug!(
            request_id = %request.id,
            model = %request.model,
            structured = request.response_schema.is_some(),
            image = request.wants_image,
            "sending generation request"
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %request.model, error = %e, "generation request failed (transport)");
                GeminiError::Network(e.to_string())
            })?;

        let response = check_status(response).await?;
        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::Decode(e.to_string()))
    }
}

/// Return the response if successful, or the API's error envelope
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let err = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => GeminiError::Api {
            code: status.as_u16(),
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => GeminiError::Api {
            code: status.as_u16(),
            status: None,
            message: body,
        },
    };
    error!(%status, error = %err, "generation request returned HTTP error");
    Err(err)
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, request: GenerationRequest) -> CoreResult<GenerationResponse> {
        let response = self.call(&request).await?;
        let output = response.into_output(request.wants_image)?;
        debug!(request_id = %request.id, "generation response received");

        Ok(GenerationResponse {
            request_id: request.id,
            output,
        })
    }

    fn metadata(&self) -> GeneratorMetadata {
        GeneratorMetadata {
            name: Some("gemini".to_string()),
            description: Some("Google Gemini generateContent API".to_string()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            capabilities: vec![
                "json-output".to_string(),
                "image-input".to_string(),
                "image-output".to_string(),
            ],
        }
    }
}
