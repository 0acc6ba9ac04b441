//! Shipped notification channels.

use async_trait::async_trait;
use raksha_core::{CoreError, NotificationChannel};
use tokio::sync::mpsc;
use tracing::info;

/// A channel that logs every dispatch and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct LoggingChannel;

#[async_trait]
impl NotificationChannel for LoggingChannel {
    async fn dispatch(&self, phone_number: &str, body: &str) -> Result<(), CoreError> {
        info!(recipient = %phone_number, chars = body.chars().count(), "Dispatching alert");
        Ok(())
    }

    fn name(&self) -> &str {
        "LoggingChannel"
    }
}

/// Build an `sms:` link carrying the recipient and the message body.
///
/// Whitespace is stripped from the number before encoding.
pub fn sms_link(phone_number: &str, body: &str) -> Option<String> {
    let number: String = phone_number.chars().filter(|c| !c.is_whitespace()).collect();
    if number.is_empty() {
        return None;
    }
    Some(format!(
        "sms:{}&body={}",
        urlencoding::encode(&number),
        urlencoding::encode(body)
    ))
}

/// A channel that turns each dispatch into an `sms:` link and queues it on
/// an outbox for the host's compose UI to open.
#[derive(Debug, Clone)]
pub struct SmsLinkChannel {
    outbox: mpsc::UnboundedSender<String>,
}

impl SmsLinkChannel {
    /// Create a channel and the receiving end of its outbox.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (outbox, rx) = mpsc::unbounded_channel();
        (Self { outbox }, rx)
    }
}

#[async_trait]
impl NotificationChannel for SmsLinkChannel {
    async fn dispatch(&self, phone_number: &str, body: &str) -> Result<(), CoreError> {
        let link = sms_link(phone_number, body)
            .ok_or_else(|| CoreError::Dispatch("empty phone number".to_string()))?;
        self.outbox
            .send(link)
            .map_err(|_| CoreError::Dispatch("outbox closed".to_string()))
    }

    fn name(&self) -> &str {
        "SmsLinkChannel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sms_link_encoding() {
        let link = sms_link("+1 555 0100", "Help me & hurry").unwrap();
        assert_eq!(link, "sms:%2B15550100&body=Help%20me%20%26%20hurry");
    }

    #[test]
    fn test_sms_link_rejects_empty_number() {
        assert!(sms_link("   ", "hi").is_none());
    }

    #[tokio::test]
    async fn test_sms_channel_queues_links() {
        let (channel, mut rx) = SmsLinkChannel::new();
        channel.dispatch("+15550100", "hi").await.unwrap();
        assert!(channel.dispatch("", "hi").await.is_err());

        assert_eq!(rx.recv().await.unwrap(), "sms:%2B15550100&body=hi");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sms_channel_closed_outbox() {
        let (channel, rx) = SmsLinkChannel::new();
        drop(rx);
        assert!(matches!(
            channel.dispatch("+15550100", "hi").await,
            Err(CoreError::Dispatch(_))
        ));
    }

    #[tokio::test]
    async fn test_logging_channel() {
        let channel = LoggingChannel;
        channel.dispatch("+15550100", "test").await.unwrap();
        assert_eq!(channel.name(), "LoggingChannel");
    }
}
