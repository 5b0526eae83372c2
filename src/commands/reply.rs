use crate::{
    app::App,
    errors::Result,
    messaging::{MessageRef, OutgoingMessage},
    notify, texts,
    types::{ApplicationStatus, BotDialogState, Sender},
};

use super::admin::show_admin_panel;

pub async fn begin_reply(
    app: &App,
    sender: &Sender,
    application_id: i32,
    message: Option<MessageRef>,
) -> Result<()> {
    app.storage
        .set_state(sender.id, &BotDialogState::ReplyApplication { application_id })
        .await?;
    app.edit_or_reply(
        sender,
        message,
        OutgoingMessage::markdown(format!(
            "💬 *Ответ на заявку \\#{}*\n\nВведите ваш ответ:",
            application_id
        )),
    )
    .await
}

/// Forwards the admin's text to the applicant and closes the application.
pub async fn receive_reply(app: &App, sender: &Sender, application_id: i32, text: &str) -> Result<()> {
    if !app.is_admin(sender) {
        log::debug!("Ignoring reply text from non-admin {}", sender.id);
        return Ok(());
    }

    let Some(application) = app.storage.get_application(application_id).await? else {
        app.storage.clear_state(sender.id).await?;
        app.reply(sender, OutgoingMessage::plain(texts::APPLICATION_NOT_FOUND))
            .await?;
        return Ok(());
    };
    let Some(owner) = app.storage.get_user_by_id(application.user_id).await? else {
        app.storage.clear_state(sender.id).await?;
        app.reply(sender, OutgoingMessage::plain(texts::OWNER_NOT_FOUND))
            .await?;
        return Ok(());
    };

    if let Err(err) = notify::deliver_reply(app, &owner, application_id, text).await {
        log::error!("Can't deliver reply to application #{}: {}", application_id, err);
        app.storage.clear_state(sender.id).await?;
        app.reply(
            sender,
            OutgoingMessage::plain(format!("❌ Ошибка отправки ответа: {}", err)),
        )
        .await?;
        return Ok(());
    }

    match app
        .storage
        .update_application_status(application_id, ApplicationStatus::Done)
        .await
    {
        Ok(true) => log::info!("Application #{} answered and closed", application_id),
        Ok(false) => log::warn!("Application #{} vanished before closing", application_id),
        Err(err) => log::error!("Can't close application #{}: {}", application_id, err),
    }

    app.storage.clear_state(sender.id).await?;
    app.reply(
        sender,
        OutgoingMessage::plain(format!(
            "✅ Ответ отправлен пользователю заявки #{}. Статус изменен на 'Выполнена'.",
            application_id
        )),
    )
    .await?;
    app.pause().await;
    show_admin_panel(app, sender).await
}

pub async fn complete_from_callback(
    app: &App,
    sender: &Sender,
    application_id: i32,
    message: Option<MessageRef>,
) -> Result<()> {
    let updated = match app
        .storage
        .update_application_status(application_id, ApplicationStatus::Done)
        .await
    {
        Ok(updated) => updated,
        Err(err) => {
            log::error!("Can't close application #{}: {}", application_id, err);
            false
        }
    };

    if !updated {
        app.reply(sender, OutgoingMessage::plain(texts::STATUS_UPDATE_FAILED))
            .await?;
        return Ok(());
    }

    app.edit_or_reply(
        sender,
        message,
        OutgoingMessage::markdown(format!(
            "✅ *Заявка \\#{} завершена\\!*\n\nСтатус изменен на 'Выполнена'",
            application_id
        )),
    )
    .await?;
    app.pause().await;
    show_admin_panel(app, sender).await
}
