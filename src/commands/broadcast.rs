use teloxide::types::ChatId;
use tera::Context;

use crate::{
    app::App,
    errors::Result,
    keyboards::get_cancel_broadcast_keyboard,
    messaging::{MessageRef, OutgoingMessage},
    templates, texts,
    types::{BotDialogState, Sender},
};

use super::admin::show_admin_panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
}

pub async fn start_broadcast(app: &App, sender: &Sender) -> Result<()> {
    app.storage
        .set_state(sender.id, &BotDialogState::BroadcastMessage)
        .await?;
    app.reply(
        sender,
        OutgoingMessage::markdown(texts::BROADCAST_PROMPT)
            .with_keyboard(get_cancel_broadcast_keyboard()),
    )
    .await?;
    Ok(())
}

/// Sends `text` to every known user, one attempt each, and records the run.
pub async fn deliver_broadcast(app: &App, text: &str) -> Result<BroadcastReport> {
    let users = app.storage.list_users().await?;
    let mut report = BroadcastReport {
        total: users.len(),
        ..Default::default()
    };
    if users.is_empty() {
        return Ok(report);
    }

    let message = OutgoingMessage::plain(text);
    for user in &users {
        match app.messenger.send(ChatId(user.telegram_id), &message).await {
            Ok(_) => report.sent += 1,
            Err(err) => {
                report.failed += 1;
                log::error!("Broadcast to {} failed: {}", user.telegram_id, err);
            }
        }
    }

    if let Err(err) = app.storage.record_broadcast(text, report.sent).await {
        log::error!("Can't record broadcast: {}", err);
    }
    log::info!(
        "Broadcast done: {} sent, {} failed of {}",
        report.sent,
        report.failed,
        report.total
    );
    Ok(report)
}

pub async fn send_broadcast(app: &App, sender: &Sender, text: &str) -> Result<()> {
    if !app.is_admin(sender) {
        log::debug!("Ignoring broadcast text from non-admin {}", sender.id);
        return Ok(());
    }

    app.storage.clear_state(sender.id).await?;
    let report = deliver_broadcast(app, text).await?;
    if report.total == 0 {
        app.reply(sender, OutgoingMessage::plain(texts::BROADCAST_NO_USERS))
            .await?;
        return Ok(());
    }

    let mut context = Context::new();
    context.insert("sent", &report.sent);
    context.insert("failed", &report.failed);
    context.insert("total", &report.total);
    let answer = templates::render(&app.tera, "broadcast_report.md", &context)?;
    app.reply(sender, OutgoingMessage::markdown(answer)).await?;
    Ok(())
}

pub async fn cancel_broadcast(app: &App, sender: &Sender, message: Option<MessageRef>) -> Result<()> {
    app.storage.clear_state(sender.id).await?;
    app.edit_or_reply(sender, message, OutgoingMessage::plain(texts::BROADCAST_CANCELLED))
        .await?;
    app.pause().await;
    show_admin_panel(app, sender).await
}
