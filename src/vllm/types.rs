use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl Message {
    pub fn user(content: Vec<ContentPart>) -> Self {
        Message {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

// Response structs model only what the page needs; serde skips unknown
// fields (id, usage, finish_reason, ...) on deserialization.

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice's message, when the backend produced one.
    /// The caller decides what an absent answer renders as.
    pub fn answer_text(&self) -> Option<&str> {
        self.choices.first()?.message.as_ref()?.content.as_deref()
    }
}

/// Builds the outbound payload for one prompt + image submission. Model id
/// and sampling settings come from configuration at construction time, never
/// from user input.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl RequestBuilder {
    pub fn new(model: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        RequestBuilder {
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    /// One user message with exactly two parts: the prompt text, then the
    /// image as an inline data URL. The image bytes are not decoded; the
    /// MIME type is assumed to be image/jpeg whatever the upload was.
    pub fn build(&self, prompt: &str, image_bytes: &[u8]) -> ChatCompletionRequest {
        let data_url = jpeg_data_url(image_bytes);
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(vec![
                ContentPart::text(prompt),
                ContentPart::image_url(data_url),
            ])],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }
}

pub fn jpeg_data_url(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}
