use serde::{Deserialize, Serialize};
use teloxide::utils::command::BotCommands;

use crate::errors::{Error, Result};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "open the main menu.")]
    Start,
    #[command(description = "abort the current action.")]
    Cancel,
    #[command(description = "display this text.")]
    Help,
}

/// Where a user is inside a multi-step flow. No stored state means idle.
///
/// Each variant carries exactly the data its step needs; the tag/payload pair
/// kept in `user_states` is produced and parsed only by `encode`/`decode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotDialogState {
    ApplicationFio,
    ApplicationPhone { fio: String },
    ApplicationInfo { fio: String, phone: String },
    DeleteApplication,
    BroadcastMessage,
    ReplyApplication { application_id: i32 },
}

pub const FORM_STATE_TAGS: [&str; 3] = ["application_fio", "application_phone", "application_info"];

const REPLY_TAG: &str = "reply_application";

#[derive(Serialize, Deserialize)]
struct FioPayload {
    fio: String,
}

#[derive(Serialize, Deserialize)]
struct ContactPayload {
    fio: String,
    phone: String,
}

#[derive(Serialize, Deserialize)]
struct ReplyPayload {
    application_id: i32,
}

fn parse_payload<T: for<'de> Deserialize<'de>>(tag: &str, payload: Option<&str>) -> Result<T> {
    let raw = payload.ok_or_else(|| Error::State(format!("{} has no payload", tag)))?;
    Ok(serde_json::from_str(raw)?)
}

impl BotDialogState {
    pub fn tag(&self) -> &'static str {
        match self {
            BotDialogState::ApplicationFio => "application_fio",
            BotDialogState::ApplicationPhone { .. } => "application_phone",
            BotDialogState::ApplicationInfo { .. } => "application_info",
            BotDialogState::DeleteApplication => "delete_application",
            BotDialogState::BroadcastMessage => "broadcast_message",
            BotDialogState::ReplyApplication { .. } => REPLY_TAG,
        }
    }

    pub fn is_form(&self) -> bool {
        FORM_STATE_TAGS.contains(&self.tag())
    }

    /// States only administrators can be in.
    pub fn is_admin_flow(&self) -> bool {
        matches!(
            self,
            BotDialogState::DeleteApplication
                | BotDialogState::BroadcastMessage
                | BotDialogState::ReplyApplication { .. }
        )
    }

    /// Tag and JSON payload as stored in `user_states`.
    pub fn encode(&self) -> Result<(&'static str, Option<String>)> {
        let payload = match self {
            BotDialogState::ApplicationPhone { fio } => {
                Some(serde_json::to_string(&FioPayload { fio: fio.clone() })?)
            }
            BotDialogState::ApplicationInfo { fio, phone } => Some(serde_json::to_string(&ContactPayload {
                fio: fio.clone(),
                phone: phone.clone(),
            })?),
            BotDialogState::ReplyApplication { application_id } => Some(serde_json::to_string(
                &ReplyPayload {
                    application_id: *application_id,
                },
            )?),
            _ => None,
        };
        Ok((self.tag(), payload))
    }

    pub fn decode(tag: &str, payload: Option<&str>) -> Result<Self> {
        let state = match tag {
            "application_fio" => BotDialogState::ApplicationFio,
            "application_phone" => {
                let FioPayload { fio } = parse_payload(tag, payload)?;
                BotDialogState::ApplicationPhone { fio }
            }
            "application_info" => {
                let ContactPayload { fio, phone } = parse_payload(tag, payload)?;
                BotDialogState::ApplicationInfo { fio, phone }
            }
            "delete_application" => BotDialogState::DeleteApplication,
            "broadcast_message" => BotDialogState::BroadcastMessage,
            REPLY_TAG => {
                let ReplyPayload { application_id } = parse_payload(tag, payload)?;
                BotDialogState::ReplyApplication { application_id }
            }
            // Rows written before the id moved into the payload.
            legacy if legacy.starts_with("reply_application_") => {
                let application_id = legacy["reply_application_".len()..]
                    .parse()
                    .map_err(|_| Error::State(format!("bad application id in {:?}", legacy)))?;
                BotDialogState::ReplyApplication { application_id }
            }
            other => return Err(Error::State(format!("unknown state tag {:?}", other))),
        };
        Ok(state)
    }
}

/// The person behind an incoming message or button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Sender {
    pub fn new(id: i64) -> Self {
        Sender {
            id,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn chat_id(&self) -> teloxide::types::ChatId {
        teloxide::types::ChatId(self.id)
    }
}

impl From<&teloxide::types::User> for Sender {
    fn from(user: &teloxide::types::User) -> Self {
        Sender {
            id: user.id.0 as i64,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationStatus {
    New,
    Done,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::New => "new",
            ApplicationStatus::Done => "done",
            ApplicationStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ApplicationStatus::New => "🆕 Новая".to_string(),
            ApplicationStatus::Done => "✅ Выполнена".to_string(),
            ApplicationStatus::Other(raw) => format!("❓ {}", raw),
        }
    }
}

impl From<&str> for ApplicationStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "new" => ApplicationStatus::New,
            "done" => ApplicationStatus::Done,
            other => ApplicationStatus::Other(other.to_string()),
        }
    }
}
