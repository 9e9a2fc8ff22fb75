//! Wire types for the DashScope native generation API.
//!
//! Request: `{model, input: {messages: [...]}, parameters: {...}}`.
//! Response: `{output: {choices: [{message: {content}}]}}` where `content` is
//! either a string or a list of `{text}` parts.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub input: GenerationInput<'a>,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
pub struct GenerationInput<'a> {
    pub messages: Vec<Message<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Serialize)]
pub struct Message<'a> {
    pub role: Role,
    pub content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    VideoUrl { video_url: VideoUrl<'a> },
}

#[derive(Debug, Serialize)]
pub struct VideoUrl<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationParameters {
    /// Always `"message"` so the reply arrives as a chat message.
    pub result_format: &'static str,
    pub max_length: u32,
    pub temperature: f64,
}

impl GenerationParameters {
    pub fn message(max_length: u32, temperature: f64) -> Self {
        Self {
            result_format: "message",
            max_length,
            temperature,
        }
    }
}

impl<'a> Message<'a> {
    pub fn system_text(text: &'a str) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text),
        }
    }

    pub fn user_text(text: &'a str) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text),
        }
    }

    pub fn system_parts(parts: Vec<ContentPart<'a>>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Parts(parts),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart<'a>>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub output: Option<GenerationOutput>,
}

#[derive(Debug, Deserialize)]
pub struct GenerationOutput {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: ResponseContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponseContent {
    Text(String),
    Parts(Vec<ResponsePart>),
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerationResponse {
    /// Text of the first choice, or `None` when the envelope carries no
    /// non-blank message. Multi-part content is joined with newlines.
    pub fn into_text(self) -> Option<String> {
        let choice = self.output?.choices.into_iter().next()?;
        let text = match choice.message.content {
            ResponseContent::Text(text) => text,
            ResponseContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n"),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
