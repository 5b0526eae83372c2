#![allow(dead_code)]

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use intake_bot::{
    app::App,
    config::Config,
    connection,
    errors::{Error, Result},
    messaging::{MessageRef, Messenger, OutgoingMessage, TextFormat},
    types::Sender,
};
use sea_orm::{ConnectOptions, DatabaseConnection};
use teloxide::types::{ChatId, MessageId};

pub const ADMIN: i64 = 1000;
pub const SECOND_ADMIN: i64 = 2000;

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Message { chat_id: i64, message: OutgoingMessage },
    Edit { chat_id: i64, text: String, format: TextFormat },
    Answer { callback_id: String, text: Option<String> },
}

/// Records everything the bot tries to send. Chats marked as failing reject
/// every send.
#[derive(Default)]
pub struct RecordingMessenger {
    log: Mutex<Vec<Delivery>>,
    failing: Mutex<HashSet<i64>>,
    next_id: AtomicI32,
}

impl RecordingMessenger {
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn messages_to(&self, chat_id: i64) -> Vec<OutgoingMessage> {
        self.deliveries()
            .into_iter()
            .filter_map(|delivery| match delivery {
                Delivery::Message { chat_id: to, message } if to == chat_id => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.messages_to(chat_id)
            .into_iter()
            .map(|message| message.text)
            .collect()
    }

    pub fn last_text_to(&self, chat_id: i64) -> Option<String> {
        self.texts_to(chat_id).pop()
    }

    pub fn edits(&self) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter_map(|delivery| match delivery {
                Delivery::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn answers(&self) -> Vec<Option<String>> {
        self.deliveries()
            .into_iter()
            .filter_map(|delivery| match delivery {
                Delivery::Answer { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, chat_id: ChatId, message: &OutgoingMessage) -> Result<MessageRef> {
        if self.failing.lock().unwrap().contains(&chat_id.0) {
            return Err(Error::Delivery(format!("chat {} is unreachable", chat_id)));
        }
        self.log.lock().unwrap().push(Delivery::Message {
            chat_id: chat_id.0,
            message: message.clone(),
        });
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
        })
    }

    async fn edit(&self, target: MessageRef, text: &str, format: TextFormat) -> Result<()> {
        self.log.lock().unwrap().push(Delivery::Edit {
            chat_id: target.chat_id.0,
            text: text.to_string(),
            format,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.log.lock().unwrap().push(Delivery::Answer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
        });
        Ok(())
    }
}

pub async fn test_connection() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    connection::connect(options).await.unwrap()
}

pub fn test_config() -> Config {
    let mut config = Config::new("test-token", "sqlite::memory:", vec![ADMIN, SECOND_ADMIN]);
    config.menu_delay = Duration::ZERO;
    config.message_pacing = Duration::ZERO;
    config.retry_backoff = Duration::ZERO;
    config
}

pub async fn setup() -> (App, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::default());
    let app = App::new(test_config(), test_connection().await, messenger.clone()).unwrap();
    (app, messenger)
}

pub fn user(id: i64) -> Sender {
    Sender {
        id,
        username: Some(format!("user{}", id)),
        first_name: Some(format!("Name{}", id)),
        last_name: None,
    }
}

/// Walks `sender` through the whole form and returns the new application id.
pub async fn submit_application(app: &App, sender: &Sender, fio: &str) -> i32 {
    use intake_bot::{keyboards, router};

    router::on_text(app, sender, keyboards::APPLY).await;
    router::on_text(app, sender, fio).await;
    router::on_text(app, sender, "+7 999 123 45 67").await;
    router::on_text(app, sender, "Нужна кухня").await;

    app.storage
        .list_applications(1)
        .await
        .unwrap()
        .first()
        .map(|application| application.id)
        .unwrap()
}
