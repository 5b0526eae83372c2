use teloxide::types::ChatId;
use tera::Context;

use crate::{
    app::App,
    entity::{applications, users},
    errors::Result,
    keyboards::get_application_keyboard,
    messaging::{MessageRef, OutgoingMessage},
    templates,
};

/// Sends with up to `send_attempts` tries, sleeping `retry_backoff` between them.
pub async fn send_with_retry(app: &App, chat_id: ChatId, message: &OutgoingMessage) -> Result<MessageRef> {
    let attempts = app.config.send_attempts.max(1);
    let mut attempt = 1;
    loop {
        match app.messenger.send(chat_id, message).await {
            Ok(sent) => return Ok(sent),
            Err(err) if attempt < attempts => {
                log::warn!("Attempt {} to send to {} failed, retrying: {}", attempt, chat_id, err);
                tokio::time::sleep(app.config.retry_backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Delivers the new-application card to every administrator independently.
/// Returns how many administrators received it.
pub async fn notify_admins(app: &App, application: &applications::Model, owner: Option<&users::Model>) -> usize {
    let text = match templates::application_card(&app.tera, application, owner, true) {
        Ok(text) => text,
        Err(err) => {
            log::error!("Can't render card for application #{}: {}", application.id, err);
            return 0;
        }
    };
    let message = OutgoingMessage::markdown(text).with_keyboard(get_application_keyboard(application.id));

    let mut delivered = 0;
    for admin_id in &app.config.admin_ids {
        match app.messenger.send(ChatId(*admin_id), &message).await {
            Ok(_) => {
                delivered += 1;
                log::info!("Application #{} sent to admin {}", application.id, admin_id);
            }
            Err(err) => log::error!(
                "Can't notify admin {} about application #{}: {}",
                admin_id,
                application.id,
                err
            ),
        }
    }
    delivered
}

/// Forwards an administrator's answer to the owner of the application.
pub async fn deliver_reply(app: &App, owner: &users::Model, application_id: i32, text: &str) -> Result<()> {
    let mut context = Context::new();
    context.insert("id", &application_id);
    context.insert("text", text);
    let body = templates::render(&app.tera, "admin_reply.md", &context)?;

    send_with_retry(app, ChatId(owner.telegram_id), &OutgoingMessage::markdown(body)).await?;
    Ok(())
}
