//! Core message types shared by all model plugins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user input.
    User,
    /// System prompt.
    System,
    /// Model output.
    Model,
    /// Tool execution result.
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::System => write!(f, "system"),
            Role::Model => write!(f, "model"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// An atomic unit of message content.
///
/// Messages can contain multiple parts of different kinds, supporting
/// rich interactions with media, tool calls, and tool results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Part {
    /// Plain text.
    #[serde(rename = "text")]
    Text { text: String },

    /// A media reference, addressed by URI.
    #[serde(rename = "media")]
    Media {
        #[serde(skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        url: String,
    },

    /// Opaque structured data, usually a JSON-mode model output.
    #[serde(rename = "data")]
    Data { data: serde_json::Value },

    /// A tool invocation requested by the model.
    #[serde(rename = "tool_request")]
    ToolRequest {
        name: String,
        input: serde_json::Map<String, serde_json::Value>,
    },

    /// The output of a tool invocation, sent back to the model.
    #[serde(rename = "tool_response")]
    ToolResponse {
        name: String,
        output: serde_json::Map<String, serde_json::Value>,
    },
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Create a media part from a URI.
    pub fn media(content_type: Option<String>, url: impl Into<String>) -> Self {
        Part::Media {
            content_type,
            url: url.into(),
        }
    }

    /// Create a data part.
    pub fn data(data: serde_json::Value) -> Self {
        Part::Data { data }
    }

    /// Create a tool-request part.
    pub fn tool_request(
        name: impl Into<String>,
        input: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Part::ToolRequest {
            name: name.into(),
            input,
        }
    }

    /// Create a tool-response part.
    pub fn tool_response(
        name: impl Into<String>,
        output: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Part::ToolResponse {
            name: name.into(),
            output,
        }
    }

    /// The text content, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Whether this part is a tool request.
    pub fn is_tool_request(&self) -> bool {
        matches!(self, Part::ToolRequest { .. })
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: Role,
    /// Content parts, in order.
    pub content: Vec<Part>,
}

impl Message {
    /// Create a message with the given role and parts.
    pub fn new(role: Role, content: Vec<Part>) -> Self {
        Self { role, content }
    }

    /// Create a user message containing a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Create a system message containing a single text part.
    pub fn system_text(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![Part::text(text)])
    }

    /// Create a model message containing a single text part.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_names() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        let role: Role = serde_json::from_str("\"tool\"").unwrap();
        assert_eq!(role, Role::Tool);
    }

    #[test]
    fn test_part_tagged_serialization() {
        let part = Part::text("hi");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hi");
    }

    #[test]
    fn test_media_part_omits_unset_content_type() {
        let part = Part::media(None, "https://example.com/cat.png");
        let json = serde_json::to_value(&part).unwrap();
        assert!(json.get("content_type").is_none());
        assert_eq!(json["url"], "https://example.com/cat.png");
    }

    #[test]
    fn test_message_text_skips_non_text_parts() {
        let msg = Message::new(
            Role::Model,
            vec![
                Part::text("a"),
                Part::data(serde_json::json!({"k": 1})),
                Part::text("b"),
            ],
        );
        assert_eq!(msg.text(), "ab");
    }

    #[test]
    fn test_is_tool_request() {
        let part = Part::tool_request("lookup", serde_json::Map::new());
        assert!(part.is_tool_request());
        assert!(!Part::text("x").is_tool_request());
    }
}
