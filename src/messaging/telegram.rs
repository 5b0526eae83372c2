use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ParseMode, ReplyMarkup},
    RequestError,
};
use std::time::Duration;
use tokio::time::sleep;

use super::{Keyboard, MessageRef, Messenger, OutgoingMessage, TextFormat};
use crate::errors::{Error, Result};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn map_err(e: RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }

    fn parse_mode(format: TextFormat) -> Option<ParseMode> {
        match format {
            TextFormat::Plain => None,
            TextFormat::MarkdownV2 => Some(ParseMode::MarkdownV2),
        }
    }

    fn markup(keyboard: &Keyboard) -> ReplyMarkup {
        match keyboard {
            Keyboard::Menu(rows) => {
                let rows: Vec<Vec<KeyboardButton>> = rows
                    .iter()
                    .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect())
                    .collect();
                KeyboardMarkup::new(rows).resize_keyboard(true).into()
            }
            Keyboard::Inline(rows) => {
                let rows: Vec<Vec<InlineKeyboardButton>> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone()))
                            .collect()
                    })
                    .collect();
                InlineKeyboardMarkup::new(rows).into()
            }
        }
    }

    /// How long Telegram's flood control asked us to wait, if that is the error.
    fn flood_wait(err: &RequestError) -> Option<Duration> {
        match err {
            RequestError::RetryAfter(secs) => Some(*secs),
            _ => None,
        }
    }

    /// Telegram flood control asks us to back off; wait as told once, then give up.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(err) => match Self::flood_wait(&err) {
                    Some(wait) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        log::warn!("Flood control hit, retrying in {:?}", wait);
                        sleep(wait).await;
                    }
                    _ => return Err(Self::map_err(err)),
                },
            }
        }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, chat_id: ChatId, message: &OutgoingMessage) -> Result<MessageRef> {
        let sent = self
            .with_retry(|| {
                let mut request = self.bot.send_message(chat_id, message.text.clone());
                if let Some(mode) = Self::parse_mode(message.format) {
                    request = request.parse_mode(mode);
                }
                if let Some(keyboard) = &message.keyboard {
                    request = request.reply_markup(Self::markup(keyboard));
                }
                request
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: sent.id,
        })
    }

    async fn edit(&self, target: MessageRef, text: &str, format: TextFormat) -> Result<()> {
        self.with_retry(|| {
            let mut request = self
                .bot
                .edit_message_text(target.chat_id, target.message_id, text.to_string());
            if let Some(mode) = Self::parse_mode(format) {
                request = request.parse_mode(mode);
            }
            request
        })
        .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.with_retry(|| {
            let mut request = self.bot.answer_callback_query(callback_id.to_string());
            if let Some(t) = text {
                request = request.text(t.to_string());
            }
            request
        })
        .await?;
        Ok(())
    }
}
