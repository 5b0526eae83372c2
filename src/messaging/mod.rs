//! Messaging gateway: what the conversation engine needs from a chat transport.

use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId};

use crate::errors::Result;

pub mod telegram;

pub use telegram::TelegramMessenger;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    MarkdownV2,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        InlineButton {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent reply keyboard; pressing a button sends its label as text.
    Menu(Vec<Vec<String>>),
    /// Buttons attached to a single message, answered through callbacks.
    Inline(Vec<Vec<InlineButton>>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Option<Keyboard>,
}

impl OutgoingMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        OutgoingMessage {
            text: text.into(),
            format: TextFormat::Plain,
            keyboard: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        OutgoingMessage {
            text: text.into(),
            format: TextFormat::MarkdownV2,
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// A message previously delivered by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Every call may fail independently; callers decide whether to retry.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, chat_id: ChatId, message: &OutgoingMessage) -> Result<MessageRef>;

    async fn edit(&self, target: MessageRef, text: &str, format: TextFormat) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
