use intake_bot::{app::App, config::Config, errors::Result, logging, reminders};
use teloxide::Bot;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::init()?;
    let _sentry = logging::init(config.sentry_url.as_deref());
    log::info!("Starting...");

    let bot = Bot::new(&config.bot_token);
    let app = App::connect(config, bot).await?;

    log::info!("Checking abandoned forms...");
    let reminded = reminders::send_reminders(&app).await?;
    log::info!("Finished, {} reminders sent", reminded);

    Ok(())
}
