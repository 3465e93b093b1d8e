//! `generateContent` request and response bodies.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mentora_core::{ContentPart, GenerationOutput, GenerationRequest};
use serde::{Deserialize, Serialize};

use crate::GeminiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    /// Base64
    pub data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

// Error envelope used by Google APIs.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

fn text_part(text: impl Into<String>) -> Part {
    Part {
        text: Some(text.into()),
        inline_data: None,
    }
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        let mut parts = vec![text_part(request.prompt.clone())];
        parts.extend(request.parts.iter().map(|part| match part {
            ContentPart::Text { text } => text_part(text.clone()),
            ContentPart::InlineData { mime_type, data } => Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                }),
            },
        }));

        let generation_config = if request.wants_image {
            Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                ..Default::default()
            })
        } else {
            request
                .response_schema
                .as_ref()
                .map(|schema| GenerationConfig {
                    response_mime_type: Some("application/json".to_string()),
                    response_schema: Some(schema.clone()),
                    ..Default::default()
                })
        };

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            system_instruction: request.system_instruction.as_ref().map(|instruction| Content {
                role: None,
                parts: vec![text_part(instruction.clone())],
            }),
            generation_config,
        }
    }
}

impl GenerateContentResponse {
    /// Pull the requested kind of output out of the first candidate
    pub(crate) fn into_output(self, wants_image: bool) -> Result<GenerationOutput, GeminiError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::Blocked(reason));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GeminiError::EmptyResponse("no candidates".to_string()));
        };
        let finish_reason = candidate.finish_reason;
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        let output = if wants_image {
            parts
                .into_iter()
                .find_map(|part| part.inline_data)
                .map(|inline| {
                    STANDARD
                        .decode(inline.data.as_bytes())
                        .map(|data| GenerationOutput::Image {
                            mime_type: inline.mime_type,
                            data,
                        })
                        .map_err(|e| GeminiError::Decode(format!("invalid image data: {e}")))
                })
                .transpose()?
        } else {
            let text: String = parts.into_iter().filter_map(|part| part.text).collect();
            (!text.trim().is_empty()).then_some(GenerationOutput::Text { text })
        };

        match (output, finish_reason) {
            (Some(output), _) => Ok(output),
            (None, Some(reason)) if matches!(reason.as_str(), "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST") => {
                Err(GeminiError::Blocked(reason))
            }
            (None, reason) => Err(GeminiError::EmptyResponse(format!(
                "no {} in response (finish reason: {})",
                if wants_image { "image" } else { "text" },
                reason.as_deref().unwrap_or("unknown")
            ))),
        }
    }
}
