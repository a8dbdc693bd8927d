use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Text that replaces an image payload when a recipe leaves the device.
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// One entry of the conversation that produced or edited a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageBody,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Message content is either a bare string or a list of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Parts(Vec<MessageContent>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64 image payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            text: Some(text.into()),
            image: None,
            mime_type: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Image,
            text: None,
            image: Some(data.into()),
            mime_type: Some(mime_type.into()),
            extra: BTreeMap::new(),
        }
    }

    /// The stand-in used for an image once its payload has been dropped.
    pub fn image_placeholder() -> Self {
        Self {
            kind: ContentKind::Image,
            text: Some(IMAGE_PLACEHOLDER.to_string()),
            image: None,
            mime_type: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Message {
    pub fn new(role: Role, content: MessageBody) -> Self {
        Self {
            role,
            content,
            extra: BTreeMap::new(),
        }
    }

    /// A copy of this message with every image part replaced by
    /// [`MessageContent::image_placeholder`]. Plain string content is
    /// returned unchanged.
    pub fn without_images(&self) -> Message {
        let content = match &self.content {
            MessageBody::Text(s) => MessageBody::Text(s.clone()),
            MessageBody::Parts(parts) => MessageBody::Parts(
                parts
                    .iter()
                    .map(|p| match p.kind {
                        ContentKind::Image => MessageContent {
                            extra: p.extra.clone(),
                            ..MessageContent::image_placeholder()
                        },
                        ContentKind::Text => p.clone(),
                    })
                    .collect(),
            ),
        };
        Message {
            role: self.role,
            content,
            extra: self.extra.clone(),
        }
    }
}
