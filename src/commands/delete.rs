use serde::Serialize;
use tera::Context;

use crate::{
    app::App,
    errors::Result,
    messaging::{MessageRef, OutgoingMessage},
    templates::{self, DATE_FORMAT},
    texts,
    types::{BotDialogState, Sender},
};

use super::admin::show_admin_panel;

const CANDIDATES_SHOWN: u64 = 10;

#[derive(Serialize)]
struct CandidateRow {
    id: i32,
    name: String,
    phone: String,
    created_at: String,
}

pub async fn start_delete_application(app: &App, sender: &Sender) -> Result<()> {
    let candidates = app.storage.list_applications(CANDIDATES_SHOWN).await?;
    if candidates.is_empty() {
        app.reply(sender, OutgoingMessage::plain(texts::NOTHING_TO_DELETE))
            .await?;
        return Ok(());
    }
    let total = app.storage.count_applications().await?;

    let rows: Vec<CandidateRow> = candidates
        .iter()
        .map(|application| CandidateRow {
            id: application.id,
            name: application.name.clone(),
            phone: application.phone.clone(),
            created_at: application.created_at.format(DATE_FORMAT).to_string(),
        })
        .collect();
    let mut context = Context::new();
    context.insert("applications", &rows);
    context.insert("rest", &total.saturating_sub(rows.len() as u64));
    let answer = templates::render(&app.tera, "delete_candidates.txt", &context)?;

    app.storage
        .set_state(sender.id, &BotDialogState::DeleteApplication)
        .await?;
    app.reply(sender, OutgoingMessage::plain(answer)).await?;
    Ok(())
}

/// Handles the id typed while in the delete step. Only a successful delete
/// leaves the step; bad input keeps it so the admin can try again.
pub async fn receive_application_id(app: &App, sender: &Sender, text: &str) -> Result<()> {
    if !app.is_admin(sender) {
        log::debug!("Ignoring delete input from non-admin {}", sender.id);
        return Ok(());
    }

    let Ok(typed_id) = text.trim().parse::<i64>() else {
        app.reply(sender, OutgoingMessage::plain(texts::DELETE_BAD_NUMBER))
            .await?;
        return Ok(());
    };

    // Ids beyond the key range can't exist.
    let deleted = match i32::try_from(typed_id) {
        Ok(application_id) => app.storage.delete_application(application_id).await?,
        Err(_) => false,
    };
    if !deleted {
        app.reply(sender, OutgoingMessage::plain(texts::DELETE_NOT_FOUND))
            .await?;
        return Ok(());
    }

    log::info!("Application #{} deleted by {}", typed_id, sender.id);
    app.storage.clear_state(sender.id).await?;
    app.reply(
        sender,
        OutgoingMessage::plain(format!("✅ Заявка #{} успешно удалена!", typed_id)),
    )
    .await?;
    app.pause().await;
    show_admin_panel(app, sender).await
}

pub async fn delete_from_callback(
    app: &App,
    sender: &Sender,
    application_id: i32,
    message: Option<MessageRef>,
) -> Result<()> {
    match app.storage.delete_application(application_id).await {
        Ok(true) => {
            log::info!("Application #{} deleted by {}", application_id, sender.id);
            app.edit_or_reply(
                sender,
                message,
                OutgoingMessage::markdown(format!("🗑️ *Заявка \\#{} удалена\\!*", application_id)),
            )
            .await?;
            app.pause().await;
            show_admin_panel(app, sender).await
        }
        Ok(false) => {
            app.reply(sender, OutgoingMessage::plain(texts::DELETE_FAILED))
                .await?;
            Ok(())
        }
        Err(err) => {
            log::error!("Can't delete application #{}: {}", application_id, err);
            app.reply(sender, OutgoingMessage::plain(texts::DELETE_FAILED))
                .await?;
            Ok(())
        }
    }
}
