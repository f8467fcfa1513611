//! Wire types for the hosted generative API.
//!
//! Mirrors the subset of the Gemini REST surface the crate uses: content
//! parts (text, function calls, function responses, inline audio data), tool
//! declarations, and the generate/embed envelopes.

use serde::{Deserialize, Serialize};

/// One message in a conversation. Roles are `user`, `model`, or `function`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            parts: vec![Part::text(text)],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: "model".into(),
            parts: vec![Part::text(text)],
        }
    }

    /// The model's own tool-call message, echoed back verbatim on the next turn.
    pub fn model_calls(calls: Vec<FunctionCall>) -> Self {
        Self {
            role: "model".into(),
            parts: calls.into_iter().map(Part::function_call).collect(),
        }
    }

    /// Synthesized tool results fed back to the model.
    pub fn function_responses(responses: Vec<FunctionResponse>) -> Self {
        Self {
            role: "function".into(),
            parts: responses.into_iter().map(Part::function_response).collect(),
        }
    }
}

/// A single content part. Exactly one field is normally set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            function_call: Some(call),
            ..Default::default()
        }
    }

    pub fn function_response(response: FunctionResponse) -> Self {
        Self {
            function_response: Some(response),
            ..Default::default()
        }
    }
}

/// A structured tool-call request from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// The caller's answer to a [`FunctionCall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

/// Base64 payload, used by the TTS response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub data: String,
}

/// A declared tool the model may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

// ── Request/response envelopes ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDeclarations>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclarations {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any text parts exist.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// All function calls in the first candidate, in order.
    pub fn function_calls(&self) -> Vec<FunctionCall> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.function_call.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Base64 inline data of the first candidate (TTS audio).
    pub fn inline_data(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct EmbedContentRequest {
    pub content: Content,
}

#[derive(Debug, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingValues {
    #[serde(default)]
    pub values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_text_response() {
        let raw = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "there"}]}}]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Hello there"));
        assert!(resp.function_calls().is_empty());
    }

    #[test]
    fn parse_function_call_response() {
        let raw = r#"{
            "candidates": [{"content": {"role": "model", "parts": [
                {"functionCall": {"name": "searchNotes", "args": {"query": "recipes"}}}
            ]}}]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.text().is_none());
        let calls = resp.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "searchNotes");
        assert_eq!(calls[0].args["query"], "recipes");
    }

    #[test]
    fn parse_empty_candidates() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text().is_none());
        assert!(resp.function_calls().is_empty());
        assert!(resp.inline_data().is_none());
    }

    #[test]
    fn request_serialization_is_camel_case() {
        let req = GenerateContentRequest {
            contents: vec![Content::user_text("hi")],
            tools: Some(vec![ToolDeclarations {
                function_declarations: vec![FunctionDeclaration {
                    name: "createNote".into(),
                    description: "d".into(),
                    parameters: serde_json::json!({"type": "object"}),
                }],
            }]),
            system_instruction: Some(Content::user_text("sys")),
            generation_config: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert!(json["tools"][0].get("functionDeclarations").is_some());
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn function_response_content_roundtrip() {
        let content = Content::function_responses(vec![FunctionResponse {
            name: "deleteNote".into(),
            response: serde_json::json!({"result": {"error": "Note not found."}}),
        }]);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["role"], "function");
        assert_eq!(
            json["parts"][0]["functionResponse"]["response"]["result"]["error"],
            "Note not found."
        );
    }
}
