use anyhow::Result;
use tracing::info;

use firstblood::config::Config;
use firstblood::ctfd::CtfdClient;
use firstblood::notify::DiscordWebhook;
use firstblood::pipeline::{announce::Announcer, poll};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("firstblood=info")),
        )
        .init();

    let config = Config::load();
    config.validate()?;

    let ctfd = CtfdClient::new(&config.ctfd_url, &config.ctfd_token)?;
    firstblood::preflight::run(&config, &ctfd).await?;

    info!("Starting CTFd Discord First Blood Announcer...");

    let webhook = DiscordWebhook::new(&config.webhook_url)?;
    let store = firstblood::db::open_store(&config.db_path)?;

    let mut announcer = Announcer::new(&ctfd, &webhook, &store).await?;
    poll::prepare(&mut announcer, config.existing).await?;

    let shutdown = poll::shutdown_on(tokio::signal::ctrl_c());
    poll::run(&mut announcer, config.poll_interval(), shutdown).await
}
