use crate::{
    app::App,
    errors::Result,
    messaging::OutgoingMessage,
    notify,
    storage::NewApplication,
    texts,
    types::{ApplicationStatus, BotDialogState, Sender},
    validation::validate_phone,
};

use super::start::show_main_menu;

pub async fn start_application(app: &App, sender: &Sender) -> Result<()> {
    app.storage.upsert_user(sender).await?;
    app.storage
        .set_state(sender.id, &BotDialogState::ApplicationFio)
        .await?;
    app.reply(sender, OutgoingMessage::plain(texts::ASK_FIO))
        .await?;
    Ok(())
}

pub async fn receive_fio(app: &App, sender: &Sender, text: &str) -> Result<()> {
    let fio = text.trim();
    if fio.is_empty() {
        app.reply(sender, OutgoingMessage::plain(texts::ASK_FIO_AGAIN))
            .await?;
        return Ok(());
    }

    app.storage
        .set_state(
            sender.id,
            &BotDialogState::ApplicationPhone {
                fio: fio.to_string(),
            },
        )
        .await?;
    app.reply(sender, OutgoingMessage::plain(texts::ASK_PHONE))
        .await?;
    Ok(())
}

pub async fn receive_phone(app: &App, sender: &Sender, fio: String, text: &str) -> Result<()> {
    let phone = text.trim();
    if !validate_phone(phone) {
        app.reply(sender, OutgoingMessage::plain(texts::PHONE_HINT))
            .await?;
        return Ok(());
    }

    app.storage
        .set_state(
            sender.id,
            &BotDialogState::ApplicationInfo {
                fio,
                phone: phone.to_string(),
            },
        )
        .await?;
    app.reply(sender, OutgoingMessage::plain(texts::ASK_INFO))
        .await?;
    Ok(())
}

/// Last step: store the application, then let the user and the admins know.
pub async fn complete_application(
    app: &App,
    sender: &Sender,
    fio: String,
    phone: String,
    text: &str,
) -> Result<()> {
    let info = text.trim();
    if info.is_empty() {
        app.reply(sender, OutgoingMessage::plain(texts::ASK_INFO_AGAIN))
            .await?;
        return Ok(());
    }

    let Some(user) = app.storage.get_user(sender.id).await? else {
        app.storage.clear_state(sender.id).await?;
        app.reply(sender, OutgoingMessage::plain(texts::USER_NOT_FOUND))
            .await?;
        return Ok(());
    };

    let new_application = NewApplication {
        name: fio,
        phone,
        additional_info: info.to_string(),
    };
    let application = match app
        .storage
        .create_application(user.id, new_application, ApplicationStatus::New)
        .await
    {
        Ok(application) => application,
        Err(err) => {
            log::error!("Can't save application of {}: {}", sender.id, err);
            app.reply(sender, OutgoingMessage::plain(texts::APPLICATION_SAVE_FAILED))
                .await?;
            return Ok(());
        }
    };
    log::info!("Application #{} created by {}", application.id, sender.id);

    if let Err(err) = app.storage.clear_state(sender.id).await {
        log::error!("Can't clear state of {}: {}", sender.id, err);
    }
    if let Err(err) = app
        .reply(sender, OutgoingMessage::plain(texts::APPLICATION_SAVED))
        .await
    {
        log::error!("Can't confirm application #{}: {}", application.id, err);
    }

    let delivered = notify::notify_admins(app, &application, Some(&user)).await;
    log::info!(
        "Application #{} delivered to {} of {} admins",
        application.id,
        delivered,
        app.config.admin_ids.len()
    );

    show_main_menu(app, sender, texts::CHOOSE_ACTION).await
}
