//! Notification sink abstraction
//!
//! The reminder sync reports release transitions through this seam. The
//! production sink is a Telegram bot; tests substitute recording fakes.

use crate::error::AppResult;

pub mod telegram;

pub use telegram::TelegramNotifier;

/// Delivery channel for release notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one message. The text may carry simple HTML markup
    /// (bold tags around the title name).
    async fn send(&self, text: &str) -> AppResult<()>;
}
