pub mod app;
pub mod bot;
pub mod commands;
pub mod config;
pub mod connection;
pub mod entity;
pub mod errors;
pub mod keyboards;
pub mod logging;
pub mod messaging;
pub mod migration;
pub mod notify;
pub mod reminders;
pub mod router;
pub mod storage;
pub mod templates;
pub mod texts;
pub mod types;
pub mod validation;
