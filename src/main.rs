use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

use creel::cli::{self, Cli, Command};
use creel::config::{self, Config};
use creel::feed::{scheduler, HttpFeedSource};
use creel::storage::Database;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config_dir = config::config_dir()?;
    std::fs::create_dir_all(&config_dir).context("failed to create config directory")?;
    let config_path = config_dir.join("config.toml");
    let mut config = Config::load(&config_path)?;

    let db_path = config
        .db_path
        .clone()
        .unwrap_or_else(|| config_dir.join("creel.db"));
    let db_path = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("invalid UTF-8 in database path"))?;
    let db = Database::open(db_path)
        .await
        .context("failed to open database")?;

    match cli.command {
        Command::Register { name } => {
            cli::register(&db, &mut config, &config_path, &name).await?;
        }
        Command::Login { name } => {
            cli::login(&db, &mut config, &config_path, &name).await?;
        }
        Command::Users => cli::users(&db, &config).await?,
        Command::AddFeed { name, url } => {
            let user = cli::require_user(&db, &config).await?;
            let source = HttpFeedSource::new()?;
            cli::add_feed(&db, &source, &user, &name, &url).await?;
        }
        Command::Feeds => cli::feeds(&db).await?,
        Command::Follow { url } => {
            let user = cli::require_user(&db, &config).await?;
            cli::follow(&db, &user, &url).await?;
        }
        Command::Following => {
            let user = cli::require_user(&db, &config).await?;
            cli::following(&db, &user).await?;
        }
        Command::Unfollow { url } => {
            let user = cli::require_user(&db, &config).await?;
            cli::unfollow(&db, &user, &url).await?;
        }
        Command::Agg { interval } => {
            let source = HttpFeedSource::new()?;
            let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = shutdown_tx.send(()).await;
                }
            });
            scheduler::run(db, source, interval, shutdown_rx).await;
        }
        Command::Browse { limit } => {
            let user = cli::require_user(&db, &config).await?;
            cli::browse(&db, &user, limit).await?;
        }
    }

    Ok(())
}
