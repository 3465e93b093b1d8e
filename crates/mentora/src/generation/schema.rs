//! Declared response schemas, one per structured content kind
//!
//! Written in the OpenAPI subset accepted by the Gemini `responseSchema`
//! field. Field names match the camelCase payload types in `content`.

use serde_json::{Value, json};

fn difficulty() -> Value {
    json!({ "type": "STRING", "enum": ["easy", "medium", "hard"] })
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

pub fn lesson() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "introduction": { "type": "STRING" },
            "sections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "heading": { "type": "STRING" },
                        "content": { "type": "STRING" }
                    },
                    "required": ["heading", "content"]
                }
            },
            "keyPoints": string_list(),
            "funFact": { "type": "STRING" }
        },
        "required": ["title", "introduction", "sections", "keyPoints"]
    })
}

pub fn quiz() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": string_list(),
                "correctAnswerIndex": { "type": "INTEGER" },
                "explanation": { "type": "STRING" },
                "difficulty": difficulty()
            },
            "required": ["question", "options", "correctAnswerIndex", "explanation", "difficulty"]
        }
    })
}

/// Diagnostic questions must name a topic from the candidate list
pub fn diagnostic_quiz(topic_ids: &[&str]) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "topicId": { "type": "STRING", "enum": topic_ids },
                "question": { "type": "STRING" },
                "options": string_list(),
                "correctAnswerIndex": { "type": "INTEGER" },
                "difficulty": difficulty()
            },
            "required": ["topicId", "question", "options", "correctAnswerIndex", "difficulty"]
        }
    })
}

pub fn flashcards() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "term": { "type": "STRING" },
                "definition": { "type": "STRING" }
            },
            "required": ["term", "definition"]
        }
    })
}

pub fn essay_prompt() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "prompt": { "type": "STRING" },
            "guidelines": string_list(),
            "suggestedWordCount": { "type": "INTEGER" }
        },
        "required": ["prompt", "guidelines", "suggestedWordCount"]
    })
}

pub fn essay_feedback() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallScore": { "type": "INTEGER" },
            "strengths": string_list(),
            "improvements": string_list(),
            "detailedFeedback": { "type": "STRING" }
        },
        "required": ["overallScore", "strengths", "improvements", "detailedFeedback"]
    })
}

pub fn summary() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "keyPoints": string_list()
        },
        "required": ["summary", "keyPoints"]
    })
}

pub fn study_plan() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "INTEGER" },
                        "focusTopic": { "type": "STRING" },
                        "activities": string_list(),
                        "durationMinutes": { "type": "INTEGER" }
                    },
                    "required": ["day", "focusTopic", "activities", "durationMinutes"]
                }
            }
        },
        "required": ["title", "days"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_difficulty_is_enumerated() {
        let schema = quiz();
        assert_eq!(
            schema["items"]["properties"]["difficulty"]["enum"],
            json!(["easy", "medium", "hard"])
        );
    }

    #[test]
    fn test_diagnostic_topic_ids_are_enumerated() {
        let schema = diagnostic_quiz(&["t-1", "t-2"]);
        assert_eq!(
            schema["items"]["properties"]["topicId"]["enum"],
            json!(["t-1", "t-2"])
        );
        assert!(
            schema["items"]["required"]
                .as_array()
                .unwrap()
                .contains(&json!("topicId"))
        );
    }
}
