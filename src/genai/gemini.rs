//! Hosted Gemini client — embeddings, chat with tool calling, and TTS.

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::GenAiConfig;
use crate::genai::wire::{
    Content, EmbedContentRequest, EmbedContentResponse, GenerateContentRequest,
    GenerateContentResponse, Part, ToolDeclarations,
};
use crate::genai::{ChatProvider, ChatRequest, ChatResponse, EmbeddingProvider, GenAiError,
    SpeechProvider};

pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    tts_model: String,
    tts_voice: String,
}

impl GeminiClient {
    /// Build a client from config. The API key comes from `GEMINI_API_KEY`.
    pub fn from_config(config: &GenAiConfig) -> Result<Self, GenAiError> {
        let api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| GenAiError::MissingApiKey)?;
        Ok(Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            tts_model: config.tts_model.clone(),
            tts_voice: config.tts_voice.clone(),
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T, GenAiError> {
        let url = format!("{}/models/{}:{}", self.api_base, model, method);
        debug!(%url, "genai request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        self.post(&self.chat_model, "generateContent", &request).await
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GenAiError> {
        let request = EmbedContentRequest {
            content: Content {
                role: "user".into(),
                parts: vec![Part::text(text)],
            },
        };
        let response: EmbedContentResponse = self
            .post(&self.embedding_model, "embedContent", &request)
            .await?;
        Ok(response.embedding.values)
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, GenAiError> {
        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(vec![ToolDeclarations {
                function_declarations: request.tools,
            }])
        };

        let response = self
            .generate_content(GenerateContentRequest {
                contents: request.contents,
                tools,
                system_instruction: request
                    .system_instruction
                    .map(|text| Content {
                        role: "user".into(),
                        parts: vec![Part::text(text)],
                    }),
                generation_config: None,
            })
            .await?;

        Ok(ChatResponse {
            text: response.text(),
            function_calls: response.function_calls(),
        })
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GenAiError> {
        let response = self
            .generate_content(GenerateContentRequest {
                contents: vec![Content::user_text(prompt)],
                tools: None,
                system_instruction: None,
                generation_config: None,
            })
            .await?;
        response
            .text()
            .ok_or_else(|| GenAiError::Malformed("response contained no text".into()))
    }

    async fn generate_json(
        &self,
        contents: Vec<Content>,
        schema: serde_json::Value,
    ) -> Result<String, GenAiError> {
        let response = self
            .generate_content(GenerateContentRequest {
                contents,
                tools: None,
                system_instruction: None,
                generation_config: Some(serde_json::json!({
                    "responseMimeType": "application/json",
                    "responseSchema": schema,
                })),
            })
            .await?;
        response
            .text()
            .ok_or_else(|| GenAiError::Malformed("response contained no text".into()))
    }
}

#[async_trait]
impl SpeechProvider for GeminiClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, GenAiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(text)],
            tools: None,
            system_instruction: None,
            generation_config: Some(serde_json::json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.tts_voice }
                    }
                },
            })),
        };
        let response: GenerateContentResponse =
            self.post(&self.tts_model, "generateContent", &request).await?;

        let data = response
            .inline_data()
            .ok_or_else(|| GenAiError::Malformed("response contained no audio".into()))?;
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| GenAiError::Malformed(format!("bad base64 audio: {e}")))
    }
}
