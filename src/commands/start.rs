use teloxide::utils::command::BotCommands;

use crate::{
    app::App,
    errors::Result,
    keyboards::get_main_keyboard,
    messaging::OutgoingMessage,
    texts,
    types::{Command, Sender},
};

use super::admin::show_admin_panel;

pub async fn show_start_info(app: &App, sender: &Sender) -> Result<()> {
    app.storage.upsert_user(sender).await?;
    app.storage.clear_state(sender.id).await?;
    show_main_menu(app, sender, texts::WELCOME).await
}

pub async fn show_main_menu(app: &App, sender: &Sender, text: &str) -> Result<()> {
    let keyboard = get_main_keyboard(app.is_admin(sender));
    app.reply(sender, OutgoingMessage::plain(text).with_keyboard(keyboard))
        .await?;
    Ok(())
}

pub async fn go_back(app: &App, sender: &Sender) -> Result<()> {
    app.storage.clear_state(sender.id).await?;
    show_main_menu(app, sender, texts::CHOOSE_ACTION).await
}

pub async fn show_contact(app: &App, sender: &Sender) -> Result<()> {
    let text = texts::contact_manager(&app.config.manager_contact);
    app.reply(sender, OutgoingMessage::plain(text)).await?;
    Ok(())
}

pub async fn show_help(app: &App, sender: &Sender) -> Result<()> {
    app.reply(
        sender,
        OutgoingMessage::plain(Command::descriptions().to_string()),
    )
    .await?;
    Ok(())
}

pub async fn cancel(app: &App, sender: &Sender) -> Result<()> {
    let state = match app.storage.get_state(sender.id).await {
        Ok(state) => state,
        Err(err) => {
            log::warn!("Dropping unreadable state of {}: {}", sender.id, err);
            None
        }
    };
    app.storage.clear_state(sender.id).await?;

    match state {
        Some(state) if state.is_admin_flow() && app.is_admin(sender) => {
            app.reply(sender, OutgoingMessage::plain(texts::CANCELLED))
                .await?;
            show_admin_panel(app, sender).await
        }
        _ => show_main_menu(app, sender, texts::CANCELLED).await,
    }
}

/// Reply for text that matches no button and no pending step.
pub async fn fallback(app: &App, sender: &Sender) -> Result<()> {
    show_main_menu(app, sender, texts::FALLBACK).await
}
