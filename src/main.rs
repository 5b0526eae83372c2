use std::sync::Arc;

use intake_bot::{app::App, bot, config::Config, errors::Result, logging, reminders};
use teloxide::Bot;
use tokio_util::sync::CancellationToken;

#[cfg(unix)]
fn stop_on_sigterm(shutdown: CancellationToken) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        terminate.recv().await;
        log::info!("Received SIGTERM, shutting down...");
        shutdown.cancel();
    });
    Ok(())
}

#[cfg(not(unix))]
fn stop_on_sigterm(_shutdown: CancellationToken) -> Result<()> {
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::init()?;
    let _sentry = logging::init(config.sentry_url.as_deref());
    log::info!("Starting...");
    log::info!("Initialized config, {} admins", config.admin_ids.len());

    let bot = Bot::new(&config.bot_token);
    let app = Arc::new(App::connect(config, bot.clone()).await?);

    let shutdown = CancellationToken::new();
    stop_on_sigterm(shutdown.clone())?;
    let reminder_loop = tokio::spawn(reminders::run(app.clone(), shutdown.clone()));

    bot::run_polling(bot, app, shutdown.clone()).await;

    shutdown.cancel();
    if let Err(err) = reminder_loop.await {
        log::error!("Reminder loop panicked: {}", err);
    }
    log::info!("Stopped");
    Ok(())
}
