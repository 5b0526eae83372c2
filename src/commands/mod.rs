pub mod admin;
pub mod application;
pub mod broadcast;
pub mod delete;
pub mod reply;
pub mod start;
