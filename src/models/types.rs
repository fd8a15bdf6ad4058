use serde::{Deserialize, Serialize};

use crate::prompt::PromptPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

impl From<&PromptPayload> for Vec<ChatMessage> {
    fn from(payload: &PromptPayload) -> Self {
        vec![
            ChatMessage::system(payload.system.clone()),
            ChatMessage::user(payload.user.clone()),
        ]
    }
}

/// Text produced by the model, and which model produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub model: String,
}

// Wire structures for the OpenAI-compatible API

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if it holds any non-blank text
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelInfo {
    pub id: String,
    /// Providers that omit the flag list only usable models
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_content_extraction() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r###"{"choices":[{"message":{"content":"## Resumo executivo"}},{"message":{"content":"other"}}]}"###,
        )
        .unwrap();
        assert_eq!(parsed.first_content().as_deref(), Some("## Resumo executivo"));
    }

    #[test]
    fn test_first_content_missing_or_blank() {
        for body in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":null}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"  \n"}}]}"#,
        ] {
            let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.first_content(), None, "body: {body}");
        }
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let body = serde_json::to_value(ChatCompletionRequest {
            model: "m",
            temperature: 0.5,
            messages: &messages,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "m",
                "temperature": 0.5,
                "messages": [
                    {"role": "system", "content": "s"},
                    {"role": "user", "content": "u"}
                ]
            })
        );
    }
}
