pub mod catalog;
pub mod notifier;
pub mod reminder_sync;

pub use catalog::{CatalogGateway, TmdbCatalog};
pub use notifier::{NotificationSink, TelegramNotifier};
pub use reminder_sync::ReminderSyncService;
