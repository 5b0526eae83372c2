//! Decides which flow an incoming update belongs to.
//!
//! Text is routed in this order: a pending broadcast takes any text, then
//! menu buttons, then the user's pending step, then the fallback menu.

use crate::{
    app::App,
    commands::{admin, application, broadcast, delete, reply, start},
    errors::{Error, Result},
    keyboards::{CallbackAction, MenuCommand},
    messaging::{MessageRef, OutgoingMessage},
    texts,
    types::{BotDialogState, Command, Sender},
};

/// An inline button press.
#[derive(Debug, Clone)]
pub struct Callback {
    pub id: String,
    pub data: String,
    pub message: Option<MessageRef>,
}

/// Failures reaching this point are logged and the user gets a generic
/// apology; the update itself is considered handled.
async fn report_failure(app: &App, sender: &Sender, result: Result<()>) {
    if let Err(err) = result {
        log::error!("Failed to handle update from {}: {}", sender.id, err);
        let apology = OutgoingMessage::plain(texts::GENERIC_ERROR);
        if let Err(err) = app.messenger.send(sender.chat_id(), &apology).await {
            log::warn!("Can't report failure to {}: {}", sender.id, err);
        }
    }
}

pub async fn on_command(app: &App, sender: &Sender, command: Command) {
    let result = match command {
        Command::Start => start::show_start_info(app, sender).await,
        Command::Cancel => start::cancel(app, sender).await,
        Command::Help => start::show_help(app, sender).await,
    };
    report_failure(app, sender, result).await;
}

pub async fn on_text(app: &App, sender: &Sender, text: &str) {
    let result = dispatch_text(app, sender, text).await;
    report_failure(app, sender, result).await;
}

pub async fn on_callback(app: &App, sender: &Sender, callback: Callback) {
    let result = dispatch_callback(app, sender, callback).await;
    report_failure(app, sender, result).await;
}

/// A stored state that no longer decodes is dropped and the user starts over.
async fn restart_flow(app: &App, sender: &Sender, err: Error) -> Result<()> {
    log::warn!("Clearing unreadable state of {}: {}", sender.id, err);
    app.storage.clear_state(sender.id).await?;
    app.reply(sender, OutgoingMessage::plain(texts::RESTART_APPLICATION))
        .await?;
    Ok(())
}

async fn dispatch_text(app: &App, sender: &Sender, text: &str) -> Result<()> {
    let state = match app.storage.get_state(sender.id).await {
        Ok(state) => state,
        Err(err @ (Error::State(_) | Error::Payload(_))) => return restart_flow(app, sender, err).await,
        Err(err) => return Err(err),
    };

    if matches!(state, Some(BotDialogState::BroadcastMessage)) && app.is_admin(sender) {
        return broadcast::send_broadcast(app, sender, text).await;
    }

    if let Some(command) = MenuCommand::parse(text) {
        if !command.admin_only() || app.is_admin(sender) {
            return run_menu_command(app, sender, command).await;
        }
        if state.is_none() {
            return admin::deny(app, sender).await;
        }
    }

    match state {
        Some(state) => continue_flow(app, sender, state, text).await,
        None => start::fallback(app, sender).await,
    }
}

async fn run_menu_command(app: &App, sender: &Sender, command: MenuCommand) -> Result<()> {
    match command {
        MenuCommand::Apply => application::start_application(app, sender).await,
        MenuCommand::Contact => start::show_contact(app, sender).await,
        MenuCommand::Back => start::go_back(app, sender).await,
        MenuCommand::AdminPanel => admin::show_admin_panel(app, sender).await,
        MenuCommand::Statistics => admin::show_statistics(app, sender).await,
        MenuCommand::Broadcast => broadcast::start_broadcast(app, sender).await,
        MenuCommand::Applications => admin::view_applications(app, sender).await,
        MenuCommand::InactiveUsers => admin::view_inactive_users(app, sender).await,
        MenuCommand::DeleteApplication => delete::start_delete_application(app, sender).await,
    }
}

async fn continue_flow(app: &App, sender: &Sender, state: BotDialogState, text: &str) -> Result<()> {
    match state {
        BotDialogState::ApplicationFio => application::receive_fio(app, sender, text).await,
        BotDialogState::ApplicationPhone { fio } => {
            application::receive_phone(app, sender, fio, text).await
        }
        BotDialogState::ApplicationInfo { fio, phone } => {
            application::complete_application(app, sender, fio, phone, text).await
        }
        BotDialogState::DeleteApplication => delete::receive_application_id(app, sender, text).await,
        BotDialogState::BroadcastMessage => broadcast::send_broadcast(app, sender, text).await,
        BotDialogState::ReplyApplication { application_id } => {
            reply::receive_reply(app, sender, application_id, text).await
        }
    }
}

async fn dispatch_callback(app: &App, sender: &Sender, callback: Callback) -> Result<()> {
    if !app.is_admin(sender) {
        log::info!("Denied callback {:?} to {}", callback.data, sender.id);
        if let Err(err) = app
            .messenger
            .answer_callback(&callback.id, Some(texts::NO_ACCESS))
            .await
        {
            log::warn!("Can't answer callback {}: {}", callback.id, err);
        }
        return Ok(());
    }

    if let Err(err) = app.messenger.answer_callback(&callback.id, None).await {
        log::warn!("Can't answer callback {}: {}", callback.id, err);
    }

    let action = match callback.data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(reason) => {
            log::warn!("Ignoring callback from {}: {}", sender.id, reason);
            return Ok(());
        }
    };

    match action {
        CallbackAction::CancelBroadcast => {
            broadcast::cancel_broadcast(app, sender, callback.message).await
        }
        CallbackAction::Reply(id) => reply::begin_reply(app, sender, id, callback.message).await,
        CallbackAction::Complete(id) => {
            reply::complete_from_callback(app, sender, id, callback.message).await
        }
        CallbackAction::Delete(id) => {
            delete::delete_from_callback(app, sender, id, callback.message).await
        }
    }
}
