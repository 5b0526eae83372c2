use std::env;
use std::time::Duration;

use crate::errors::{Error, Result};

const DEFAULT_DB_URL: &str = "sqlite://database.db?mode=rwc";
const DEFAULT_MANAGER_CONTACT: &str = "@username_manager";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub db_url: String,
    pub admin_ids: Vec<i64>,
    pub sentry_url: Option<String>,
    pub manager_contact: String,
    /// Pause before an admin is shown the panel again after an action.
    pub menu_delay: Duration,
    /// Pause between consecutive cards when listing applications.
    pub message_pacing: Duration,
    pub send_attempts: usize,
    pub retry_backoff: Duration,
    pub reminder_interval: Duration,
    pub reminder_cooldown: Duration,
    pub stale_after: chrono::Duration,
}

fn read_from_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("Can't read {} from env", name))),
    }
}

fn read_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Ten years; longer periods overflow date arithmetic further down.
const MAX_REMINDER_INTERVAL_SECS: u64 = 10 * 365 * 24 * 60 * 60;
const MAX_STALE_AFTER_HOURS: u64 = 10 * 365 * 24;

/// Parses a number in `1..=max`, falling back to `default` when unset.
fn parse_number(name: &str, raw: Option<&str>, default: u64, max: u64) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if (1..=max).contains(&value) => Ok(value),
        _ => Err(Error::Config(format!(
            "{} must be a number between 1 and {}, got {:?}",
            name, max, raw
        ))),
    }
}

fn read_number(name: &str, default: u64, max: u64) -> Result<u64> {
    parse_number(name, read_optional(name).as_deref(), default, max)
}

/// Parses a comma-separated list of administrator ids, skipping blank entries.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| Error::Config(format!("invalid administrator id {:?}", part)))
        })
        .collect::<Result<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(Error::Config("ADMIN_USER_IDS is empty".to_string()));
    }
    Ok(ids)
}

impl Config {
    pub fn new(bot_token: impl Into<String>, db_url: impl Into<String>, admin_ids: Vec<i64>) -> Self {
        Config {
            bot_token: bot_token.into(),
            db_url: db_url.into(),
            admin_ids,
            sentry_url: None,
            manager_contact: DEFAULT_MANAGER_CONTACT.to_string(),
            menu_delay: Duration::from_secs(2),
            message_pacing: Duration::from_secs(2),
            send_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            reminder_interval: Duration::from_secs(6 * 60 * 60),
            reminder_cooldown: Duration::from_secs(60),
            stale_after: chrono::Duration::hours(24),
        }
    }

    pub fn init() -> Result<Self> {
        let bot_token = read_from_env("BOT_TOKEN")?;
        let admin_ids = parse_admin_ids(&read_from_env("ADMIN_USER_IDS")?)?;
        let db_url = read_optional("DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());

        let mut config = Config::new(bot_token, db_url, admin_ids);
        config.sentry_url = read_optional("SENTRY_URL");
        if let Some(contact) = read_optional("MANAGER_CONTACT") {
            config.manager_contact = contact;
        }
        config.reminder_interval = Duration::from_secs(read_number(
            "REMINDER_INTERVAL_SECS",
            config.reminder_interval.as_secs(),
            MAX_REMINDER_INTERVAL_SECS,
        )?);
        let stale_after_hours = read_number("STALE_AFTER_HOURS", 24, MAX_STALE_AFTER_HOURS)?;
        config.stale_after = chrono::Duration::hours(stale_after_hours as i64);

        Ok(config)
    }

    pub fn is_admin(&self, telegram_id: i64) -> bool {
        self.admin_ids.contains(&telegram_id)
    }
}
