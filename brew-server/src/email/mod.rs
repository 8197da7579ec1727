//! Outbound email
//!
//! Delivery is best effort. Handlers call [`notify`], which spawns the send
//! and only logs a failure; no caller ever sees an email error.

pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

pub use templates::EmailMessage;

use crate::error::BoxError;

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError>;
}

/// AWS SES v2 sender
pub struct SesEmailSender {
    ses: SesClient,
    from: String,
}

impl SesEmailSender {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }
}

#[async_trait]
impl EmailSender for SesEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;
        let body = Body::builder()
            .text(Content::builder().data(body).build()?)
            .build();
        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        tracing::info!(to = to, "Email sent");
        Ok(())
    }
}

/// Used when no sender address is configured: logs instead of delivering
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        tracing::info!(to = to, subject = subject, "Email delivery disabled, message logged");
        tracing::debug!(to = to, body = body, "Email body");
        Ok(())
    }
}

/// Fire-and-forget send on a background task
pub fn notify(sender: Arc<dyn EmailSender>, to: String, message: EmailMessage) {
    tokio::spawn(async move {
        if let Err(e) = sender.send(&to, &message.subject, &message.body).await {
            tracing::warn!(to = %to, subject = %message.subject, "Email delivery failed: {e}");
        }
    });
}

#[cfg(test)]
pub mod testing {
    //! Recording sender for handler-level tests

    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingSender {
        pub sent: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl EmailSender for RecordingSender {
        async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), BoxError> {
            if self.fail {
                return Err("smtp down".into());
            }
            self.sent.lock().await.push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSender;
    use super::*;

    #[tokio::test]
    async fn test_log_sender_never_fails() {
        assert!(LogEmailSender.send("a@brew.test", "s", "b").await.is_ok());
    }

    #[tokio::test]
    async fn test_notify_delivers_in_background() {
        let sender = Arc::new(RecordingSender::default());
        notify(
            sender.clone(),
            "ana@brew.test".into(),
            templates::account_rejected("Ana"),
        );
        for _ in 0..50 {
            if !sender.sent.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let sent = sender.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "ana@brew.test");
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..Default::default()
        });
        notify(sender.clone(), "x@brew.test".into(), templates::account_rejected("X"));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(sender.sent.lock().await.is_empty());
    }
}
