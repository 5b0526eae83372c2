use std::sync::Arc;

use sea_orm::DatabaseConnection;
use teloxide::Bot;
use tera::Tera;

use crate::{
    config::Config,
    connection,
    errors::Result,
    messaging::{MessageRef, Messenger, OutgoingMessage, TelegramMessenger},
    notify,
    storage::Storage,
    templates,
    types::Sender,
};

/// Everything a handler needs, built once at start-up and shared by reference.
pub struct App {
    pub config: Config,
    pub storage: Storage,
    pub messenger: Arc<dyn Messenger>,
    pub tera: Tera,
}

impl App {
    pub fn new(config: Config, connection: DatabaseConnection, messenger: Arc<dyn Messenger>) -> Result<Self> {
        Ok(App {
            config,
            storage: Storage::new(connection),
            messenger,
            tera: templates::init()?,
        })
    }

    /// Connects to the database and talks to Telegram through `bot`.
    pub async fn connect(config: Config, bot: Bot) -> Result<Self> {
        let connection = connection::init(&config.db_url).await?;
        App::new(config, connection, Arc::new(TelegramMessenger::new(bot)))
    }

    pub fn is_admin(&self, sender: &Sender) -> bool {
        self.config.is_admin(sender.id)
    }

    /// User-facing send, retried on failure.
    pub async fn reply(&self, sender: &Sender, message: OutgoingMessage) -> Result<MessageRef> {
        notify::send_with_retry(self, sender.chat_id(), &message).await
    }

    /// Rewrites the message a button was pressed on, or sends a new one when
    /// there is none or it can no longer be edited.
    pub async fn edit_or_reply(
        &self,
        sender: &Sender,
        target: Option<MessageRef>,
        message: OutgoingMessage,
    ) -> Result<()> {
        if let Some(target) = target {
            match self.messenger.edit(target, &message.text, message.format).await {
                Ok(()) => return Ok(()),
                Err(err) => log::warn!("Can't edit message for {}: {}", sender.id, err),
            }
        }
        self.reply(sender, message).await?;
        Ok(())
    }

    pub async fn pause(&self) {
        if !self.config.menu_delay.is_zero() {
            tokio::time::sleep(self.config.menu_delay).await;
        }
    }
}
