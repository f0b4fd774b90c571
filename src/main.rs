use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nightwatch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, create_redis_client, Cache, PgReminderStore, PgWatchlistStore},
    jobs,
    services::{ReminderSyncService, TelegramNotifier, TmdbCatalog},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nightwatch_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let pool = create_pool(&config.database_url)
        .await
        .context("connecting to Postgres")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("running database migrations")?;
    tracing::info!("Database ready");

    let redis_client =
        create_redis_client(&config.redis_url).context("connecting to Redis")?;
    let (cache, _cache_writer) = Cache::new(redis_client).await;
    tracing::info!("Cache ready");

    let catalog = Arc::new(TmdbCatalog::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let reminders = Arc::new(PgReminderStore::new(pool.clone()));
    let watchlist = Arc::new(PgWatchlistStore::new(pool.clone()));
    let notifier = Arc::new(TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
        config.telegram_api_url.clone(),
    ));

    let sync_service = Arc::new(ReminderSyncService::new(
        catalog.clone(),
        reminders.clone(),
        notifier,
        config.notify_user_id.clone(),
    ));

    let _scheduler = jobs::start_reminder_sync_job(sync_service, &config.reminder_sync_schedule)
        .await
        .context("starting reminder sync job")?;
    tracing::info!(schedule = %config.reminder_sync_schedule, "Reminder sync job scheduled");

    let state = AppState::new(catalog, reminders, watchlist);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
