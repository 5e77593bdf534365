use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::prelude::*;

use epulsaku_webhook::adapters::{
    NoopNotifier, PostgresSettingsStore, PostgresTransactionRepository, TelegramNotifier,
};
use epulsaku_webhook::ports::NotificationSink;
use epulsaku_webhook::{AppState, config, create_app, startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("database migrations completed");

    let report = startup::validate_environment(&config, &pool).await?;
    report.log();
    if !report.is_valid() {
        anyhow::bail!("startup validation failed");
    }

    let notifier: Arc<dyn NotificationSink> = match &config.telegram {
        Some(telegram) => {
            tracing::info!("Telegram notification sink configured");
            Arc::new(TelegramNotifier::new(
                telegram.bot_token.clone(),
                telegram.chat_id.clone(),
            ))
        }
        None => {
            tracing::warn!("no Telegram credentials, notifications disabled");
            Arc::new(NoopNotifier)
        }
    };

    let state = AppState {
        transactions: Arc::new(PostgresTransactionRepository::new(pool.clone())),
        settings: Arc::new(PostgresSettingsStore::new(pool)),
        notifier,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(create_app(state).into_make_service())
        .await?;

    Ok(())
}
