use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::{ContentType, TrendingKind};

/// Keys for cached catalog lookups. Reminder sync reads are never cached,
/// so no key exists for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search(String),
    Trending(TrendingKind),
    Discover(ContentType, String),
    Genres(ContentType),
    Details(ContentType, i64),
    Season(i64, i32),
    Providers(ContentType, i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::Trending(kind) => write!(f, "trending:{}", kind.as_str()),
            CacheKey::Discover(kind, fingerprint) => {
                write!(f, "discover:{}:{}", kind.as_str(), fingerprint)
            }
            CacheKey::Genres(kind) => write!(f, "genres:{}", kind.as_str()),
            CacheKey::Details(kind, id) => write!(f, "details:{}:{}", kind.as_str(), id),
            CacheKey::Season(id, number) => write!(f, "season:{}:{}", id, number),
            CacheKey::Providers(kind, id) => write!(f, "providers:{}:{}", kind.as_str(), id),
        }
    }
}

/// Opens the Redis client used for catalog caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// A pending write queued for the background writer
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed TTL cache for catalog lookups
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Owner side of the writer task's shutdown signal
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Builds the cache and spawns its write-behind task.
    ///
    /// Writes are handed to the task over a channel so cache population
    /// never blocks API responses.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        let handle = CacheWriterHandle { shutdown_tx };

        (cache, handle)
    }

    /// Drains queued writes into Redis.
    ///
    /// Runs until a shutdown signal arrives or every sender is dropped. On
    /// shutdown the channel is closed first so the flush loop terminates
    /// even while `Cache` clones are still alive elsewhere.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                msg = write_rx.recv() => match msg {
                    Some(msg) => {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to write to Redis cache");
                        }
                    }
                    // All senders dropped, nothing left to flush
                    None => break,
                },
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");
                    write_rx.close();

                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }
                    break;
                }
            }
        }

        tracing::info!("Cache writer task stopped");
    }

    /// Applies one queued write with its TTL
    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Looks up a key, deserializing the stored JSON.
    ///
    /// Returns `None` on a miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for the write-behind task.
    ///
    /// The Redis write happens later; failures are logged, not surfaced.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}
