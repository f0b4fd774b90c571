use std::sync::Arc;

use crate::{
    db::{ReminderStore, WatchlistStore},
    services::catalog::CatalogGateway,
};

/// Shared application state
///
/// Handlers depend on the traits, so tests can swap in in-memory stores
/// and a canned catalog.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogGateway>,
    pub reminders: Arc<dyn ReminderStore>,
    pub watchlist: Arc<dyn WatchlistStore>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        reminders: Arc<dyn ReminderStore>,
        watchlist: Arc<dyn WatchlistStore>,
    ) -> Self {
        Self {
            catalog,
            reminders,
            watchlist,
        }
    }
}
