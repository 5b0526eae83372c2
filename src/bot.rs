use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};
use tokio_util::sync::CancellationToken;

use crate::{
    app::App,
    errors::Error,
    messaging::MessageRef,
    router::{self, Callback},
    types::{Command, Sender},
};

pub fn schema() -> UpdateHandler<Error> {
    let message_handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_map(|msg: Message| msg.text().and_then(|text| Command::parse(text, "").ok()))
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter_map(|msg: Message| msg.text().map(str::to_owned)).endpoint(handle_text),
        )
        .endpoint(|msg: Message| async move {
            log::debug!("Ignoring non-text message in {}", msg.chat.id);
            Ok::<(), Error>(())
        });

    let callback_handler = Update::filter_callback_query().endpoint(handle_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

fn message_sender(msg: &Message) -> Option<Sender> {
    msg.from().map(Sender::from)
}

async fn handle_command(app: Arc<App>, msg: Message, command: Command) -> Result<(), Error> {
    if let Some(sender) = message_sender(&msg) {
        router::on_command(&app, &sender, command).await;
    }
    Ok(())
}

async fn handle_text(app: Arc<App>, msg: Message, text: String) -> Result<(), Error> {
    if let Some(sender) = message_sender(&msg) {
        router::on_text(&app, &sender, &text).await;
    }
    Ok(())
}

async fn handle_callback(app: Arc<App>, query: CallbackQuery) -> Result<(), Error> {
    let sender = Sender::from(&query.from);
    let callback = Callback {
        id: query.id,
        data: query.data.unwrap_or_default(),
        message: query.message.map(|msg| MessageRef {
            chat_id: msg.chat.id,
            message_id: msg.id,
        }),
    };
    router::on_callback(&app, &sender, callback).await;
    Ok(())
}

/// Long-polls Telegram until Ctrl-C or until `shutdown` is cancelled.
/// Updates from one chat are handled in arrival order.
pub async fn run_polling(bot: Bot, app: Arc<App>, shutdown: CancellationToken) {
    let mut dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![app])
        .enable_ctrlc_handler()
        .build();

    let dispatcher_token = dispatcher.shutdown_token();
    let watcher = tokio::spawn(async move {
        shutdown.cancelled().await;
        if let Ok(stopped) = dispatcher_token.shutdown() {
            stopped.await;
        }
    });

    log::info!("Started listening...");
    dispatcher.dispatch().await;
    watcher.abort();
}
