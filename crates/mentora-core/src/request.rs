//! Generation request and response types for mentora-core

use serde::{Deserialize, Serialize};
use std::fmt;

/// NewType pattern for Request ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new RequestId
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extra content sent alongside the prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    /// Base64-encoded binary content, e.g. a camera snapshot
    InlineData { mime_type: String, data: String },
}

/// A single call to a generation model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Unique request ID
    pub id: RequestId,
    /// Model identifier, e.g. `gemini-2.0-flash`
    pub model: String,
    /// Natural-language instruction
    pub prompt: String,
    /// Declared JSON output schema, if the caller expects structured output
    pub response_schema: Option<serde_json::Value>,
    /// Optional system instruction
    pub system_instruction: Option<String>,
    /// Additional content parts (images, documents)
    pub parts: Vec<ContentPart>,
    /// Ask the provider for image output instead of text
    pub wants_image: bool,
}

impl GenerationRequest {
    /// Create a plain text request
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            model: model.into(),
            prompt: prompt.into(),
            response_schema: None,
            system_instruction: None,
            parts: Vec::new(),
            wants_image: false,
        }
    }

    /// Declare the JSON shape the response must follow
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Set the system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Append a content part
    pub fn with_part(mut self, part: ContentPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Request image output
    pub fn image(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            wants_image: true,
            ..Self::text(model, prompt)
        }
    }
}

/// What the provider produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationOutput {
    /// Text output, possibly JSON and possibly wrapped in code fences
    Text { text: String },
    /// Raw image bytes
    Image { mime_type: String, data: Vec<u8> },
}

/// Response from a generation model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Corresponding request ID
    pub request_id: RequestId,
    /// Generated output
    pub output: GenerationOutput,
}

impl GenerationResponse {
    /// Create a text response
    pub fn text(request_id: RequestId, text: impl Into<String>) -> Self {
        Self {
            request_id,
            output: GenerationOutput::Text { text: text.into() },
        }
    }

    /// Borrow the text output, if any
    pub fn as_text(&self) -> Option<&str> {
        match &self.output {
            GenerationOutput::Text { text } => Some(text),
            GenerationOutput::Image { .. } => None,
        }
    }
}
