use std::io::{self, Read};

use intake_bot::{app::App, commands::broadcast, config::Config, errors::Result, logging};
use teloxide::Bot;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::init()?;
    let _sentry = logging::init(config.sentry_url.as_deref());
    log::info!("Starting...");

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        log::error!("Input is empty");
        return Ok(());
    }

    let bot = Bot::new(&config.bot_token);
    let app = App::connect(config, bot).await?;

    let report = broadcast::deliver_broadcast(&app, input).await?;
    log::info!(
        "Finished! {} sent, {} failed of {} users",
        report.sent,
        report.failed,
        report.total
    );

    Ok(())
}
