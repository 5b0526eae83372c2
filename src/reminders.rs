use std::sync::Arc;

use chrono::Utc;
use teloxide::types::ChatId;
use tokio_util::sync::CancellationToken;

use crate::{
    app::App,
    errors::Result,
    messaging::OutgoingMessage,
    storage::StaleForm,
    texts,
};

async fn remind(app: &App, form: &StaleForm) -> Result<()> {
    let mut text = texts::REMINDER.to_string();
    if let Some(prompt) = texts::form_prompt(&form.state) {
        text.push_str("\n\n");
        text.push_str(prompt);
    }

    app.messenger
        .send(ChatId(form.chat_id), &OutgoingMessage::plain(text))
        .await?;
    if !app.storage.mark_reminded(form).await? {
        log::debug!("{} moved on while being reminded", form.chat_id);
    }
    Ok(())
}

/// One pass over abandoned forms. Each one is reminded at most once until the
/// user moves on to another step. Returns how many reminders went out.
pub async fn send_reminders(app: &App) -> Result<usize> {
    let cutoff = Utc::now().naive_utc() - app.config.stale_after;
    let stale = app.storage.list_stale_form_states(cutoff).await?;

    let mut reminded = 0;
    for form in &stale {
        match remind(app, form).await {
            Ok(()) => reminded += 1,
            Err(err) => log::error!("Can't remind {}: {}", form.chat_id, err),
        }
    }
    Ok(reminded)
}

/// Repeats `send_reminders` every `reminder_interval` until `shutdown` fires.
/// A failed cycle is retried after `reminder_cooldown`.
pub async fn run(app: Arc<App>, shutdown: CancellationToken) {
    log::info!(
        "Reminder loop started, every {:?}",
        app.config.reminder_interval
    );

    while !shutdown.is_cancelled() {
        let pause = match send_reminders(&app).await {
            Ok(reminded) => {
                if reminded > 0 {
                    log::info!("Sent {} reminders", reminded);
                }
                app.config.reminder_interval
            }
            Err(err) => {
                log::error!("Reminder cycle failed: {}", err);
                app.config.reminder_cooldown
            }
        };

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(pause) => {}
        }
    }

    log::info!("Reminder loop stopped");
}
