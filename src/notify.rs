//! Outbound message delivery. Fire-and-forget from the core's perspective:
//! callers log failures and move on, they never retry.

use async_trait::async_trait;

use crate::error::CoreError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, text: &str) -> Result<(), CoreError>;
}

/// Prints outbound messages through the logger. Stands in for the real
/// transport in the console binary.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, to: &str, text: &str) -> Result<(), CoreError> {
        log::info!("📤 -> {to}: {text}");
        Ok(())
    }
}
