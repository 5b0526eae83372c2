use serde::Serialize;
use tera::Context;

use crate::{
    app::App,
    entity::{applications, users},
    errors::Result,
    keyboards::{get_admin_keyboard, get_application_keyboard},
    messaging::OutgoingMessage,
    notify::send_with_retry,
    templates::{self, DATE_FORMAT},
    texts,
    types::Sender,
};

/// How many applications the listing shows, newest first.
pub const LIST_LIMIT: u64 = 50;
const INACTIVE_BATCH: usize = 5;
const STATISTICS_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

#[derive(Serialize)]
struct InactiveUserRow {
    telegram_id: i64,
    first_name: String,
    username: String,
    last_activity: String,
}

impl From<&users::Model> for InactiveUserRow {
    fn from(user: &users::Model) -> Self {
        InactiveUserRow {
            telegram_id: user.telegram_id,
            first_name: user
                .first_name
                .clone()
                .unwrap_or_else(|| "Не указано".to_string()),
            username: user
                .username
                .as_ref()
                .map(|username| format!("@{}", username))
                .unwrap_or_else(|| "не указан".to_string()),
            last_activity: user.last_activity.format(DATE_FORMAT).to_string(),
        }
    }
}

pub async fn show_admin_panel(app: &App, sender: &Sender) -> Result<()> {
    if !app.is_admin(sender) {
        app.reply(sender, OutgoingMessage::plain(texts::NO_PANEL_ACCESS))
            .await?;
        return Ok(());
    }

    app.reply(
        sender,
        OutgoingMessage::markdown(texts::ADMIN_PANEL).with_keyboard(get_admin_keyboard()),
    )
    .await?;
    Ok(())
}

async fn back_to_panel(app: &App, sender: &Sender) -> Result<()> {
    app.pause().await;
    show_admin_panel(app, sender).await
}

pub async fn deny(app: &App, sender: &Sender) -> Result<()> {
    log::info!("Denied admin action to {}", sender.id);
    app.reply(sender, OutgoingMessage::plain(texts::NO_ACCESS))
        .await?;
    Ok(())
}

pub async fn show_statistics(app: &App, sender: &Sender) -> Result<()> {
    let mut context = Context::new();
    context.insert("users", &app.storage.count_users().await?);
    context.insert("applications", &app.storage.count_applications().await?);
    context.insert(
        "date",
        &chrono::Local::now().format(STATISTICS_DATE_FORMAT).to_string(),
    );
    let answer = templates::render(&app.tera, "statistics.md", &context)?;

    app.reply(sender, OutgoingMessage::markdown(answer)).await?;
    back_to_panel(app, sender).await
}

pub async fn view_applications(app: &App, sender: &Sender) -> Result<()> {
    let applications = match app.storage.list_applications(LIST_LIMIT).await {
        Ok(applications) => applications,
        Err(err) => {
            log::error!("Can't load applications: {}", err);
            app.reply(sender, OutgoingMessage::plain(texts::LISTING_FAILED))
                .await?;
            return back_to_panel(app, sender).await;
        }
    };

    if applications.is_empty() {
        app.reply(sender, OutgoingMessage::plain(texts::NO_APPLICATIONS))
            .await?;
        return back_to_panel(app, sender).await;
    }

    app.reply(
        sender,
        OutgoingMessage::markdown(format!("📋 *Все заявки \\({}\\):*", applications.len())),
    )
    .await?;

    let last = applications.len() - 1;
    for (index, application) in applications.iter().enumerate() {
        send_application_card(app, sender, application).await;
        if index < last && !app.config.message_pacing.is_zero() {
            tokio::time::sleep(app.config.message_pacing).await;
        }
    }

    back_to_panel(app, sender).await
}

/// Tries the formatted card first and falls back to plain text. A card that
/// can't be delivered either way is logged and skipped.
async fn send_application_card(app: &App, sender: &Sender, application: &applications::Model) {
    let owner = match app.storage.get_user_by_id(application.user_id).await {
        Ok(owner) => owner,
        Err(err) => {
            log::warn!("Can't load owner of application #{}: {}", application.id, err);
            None
        }
    };
    let keyboard = get_application_keyboard(application.id);

    match templates::application_card(&app.tera, application, owner.as_ref(), false) {
        Ok(card) => {
            let message = OutgoingMessage::markdown(card).with_keyboard(keyboard.clone());
            match send_with_retry(app, sender.chat_id(), &message).await {
                Ok(_) => return,
                Err(err) => log::warn!(
                    "Formatted card #{} rejected, sending plain text: {}",
                    application.id,
                    err
                ),
            }
        }
        Err(err) => log::error!("Can't render card #{}: {}", application.id, err),
    }

    let message = OutgoingMessage::plain(templates::plain_application_card(application, owner.as_ref()))
        .with_keyboard(keyboard);
    if let Err(err) = send_with_retry(app, sender.chat_id(), &message).await {
        log::error!("Giving up on card #{}: {}", application.id, err);
    }
}

pub async fn view_inactive_users(app: &App, sender: &Sender) -> Result<()> {
    let inactive = app.storage.list_users_without_applications().await?;
    if inactive.is_empty() {
        app.reply(sender, OutgoingMessage::plain(texts::ALL_USERS_APPLIED))
            .await?;
        return Ok(());
    }

    for batch in inactive.chunks(INACTIVE_BATCH) {
        let rows: Vec<InactiveUserRow> = batch.iter().map(InactiveUserRow::from).collect();
        let mut context = Context::new();
        context.insert("users", &rows);
        let answer = templates::render(&app.tera, "inactive_users.md", &context)?;
        app.reply(sender, OutgoingMessage::markdown(answer)).await?;
    }

    let total = app.storage.count_users().await?;
    let without_applications = inactive.len() as u64;
    let with_applications = total.saturating_sub(without_applications);

    let mut context = Context::new();
    context.insert("total", &total);
    context.insert("with_applications", &with_applications);
    context.insert("without_applications", &without_applications);
    context.insert(
        "conversion",
        &format!("{:.1}", conversion(with_applications, total)),
    );
    let summary = templates::render(&app.tera, "activity_summary.md", &context)?;
    app.reply(sender, OutgoingMessage::markdown(summary)).await?;
    Ok(())
}

fn conversion(with_applications: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    with_applications as f64 / total as f64 * 100.0
}
