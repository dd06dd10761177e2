//! Delivery of password reset links.

use async_trait::async_trait;

use crate::error::UserResult;

/// Sends the reset link to the account's address.
///
/// A failure makes the service discard the issued token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResetMailer: Send + Sync {
    async fn send_reset_link(&self, email: &str, reset_url: &str) -> UserResult<()>;
}

/// Writes reset links to the log instead of sending mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl ResetMailer for LogMailer {
    async fn send_reset_link(&self, email: &str, reset_url: &str) -> UserResult<()> {
        tracing::info!(
            to = %email,
            reset_url = %reset_url,
            "Your password reset token is as follows; ignore it if you did not request it"
        );
        Ok(())
    }
}
