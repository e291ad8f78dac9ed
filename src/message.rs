//! Conversation entries
//!
//! A message is created once and never changed afterwards, so the fields are
//! private and only exposed through accessors.

use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

/// One line of conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::System,
            text: text.into(),
        }
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_tag_sender() {
        assert_eq!(Message::user("hi").sender(), Sender::User);
        assert_eq!(Message::system("hello").sender(), Sender::System);
    }

    #[test]
    fn test_serializes_with_lowercase_sender() {
        let json = serde_json::to_value(Message::system("ok")).unwrap();
        assert_eq!(json, serde_json::json!({ "sender": "system", "text": "ok" }));
    }
}
