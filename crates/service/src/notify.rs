//! Owner notification for new contact messages.
//!
//! Delivery runs detached from the request that stored the message: a failed
//! send is logged and dropped, the stored row is the only result that counts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use configs::NotifyConfig;
use models::contact_message;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("bad header: {0}")]
    BadHeader(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl OutboundMail {
    fn check_headers(&self) -> Result<(), NotifyError> {
        for (name, value) in [("from", &self.from), ("to", &self.to), ("subject", &self.subject)] {
            if value.contains(['\r', '\n']) {
                return Err(NotifyError::BadHeader(format!("{name} contains a line break")));
            }
        }
        Ok(())
    }
}

/// Mail transport seam.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError>;
}

/// Accepts and discards every message.
pub struct NoopTransport;

#[async_trait]
impl MailTransport for NoopTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        debug!(to = %mail.to, subject = %mail.subject, "no mail relay configured; message dropped");
        Ok(())
    }
}

/// POSTs `{from, to, subject, text}` as JSON to an HTTP mail relay.
pub struct HttpRelayTransport {
    client: reqwest::Client,
    relay_url: String,
}

impl HttpRelayTransport {
    pub fn new(relay_url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(Self { client, relay_url: relay_url.into() })
    }
}

#[async_trait]
impl MailTransport for HttpRelayTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        self.client
            .post(&self.relay_url)
            .json(mail)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(())
    }
}

/// Builds the owner notification and hands it to the transport off the request path.
#[derive(Clone)]
pub struct ContactNotifier {
    transport: Arc<dyn MailTransport>,
    owner_email: Option<String>,
    from_email: String,
}

impl ContactNotifier {
    pub fn new(transport: Arc<dyn MailTransport>, owner_email: Option<String>, from_email: impl Into<String>) -> Self {
        Self { transport, owner_email, from_email: from_email.into() }
    }

    /// Never sends anything.
    pub fn disabled() -> Self { Self::new(Arc::new(NoopTransport), None, "noreply@localhost") }

    pub fn from_config(cfg: &NotifyConfig) -> Result<Self, NotifyError> {
        let transport: Arc<dyn MailTransport> = match cfg.relay_url.as_deref() {
            Some(url) => Arc::new(HttpRelayTransport::new(url, Duration::from_secs(cfg.timeout_secs))?),
            None => Arc::new(NoopTransport),
        };
        info!(
            enabled = cfg.owner_email.is_some(),
            relay = cfg.relay_url.is_some(),
            "contact notifier configured"
        );
        Ok(Self::new(transport, cfg.owner_email.clone(), cfg.from_email.clone()))
    }

    pub fn is_enabled(&self) -> bool { self.owner_email.is_some() }

    /// `None` when no owner address is configured.
    pub fn compose(&self, msg: &contact_message::Model) -> Option<OutboundMail> {
        let to = self.owner_email.clone()?;
        let subject_line = if msg.subject.trim().is_empty() { "Sans sujet" } else { msg.subject.as_str() };
        let text = format!(
            "Nom : {}\nEmail : {}\nTéléphone : {}\nSujet : {}\n\nMessage :\n{}\n",
            msg.name,
            msg.email,
            if msg.phone.is_empty() { "-" } else { msg.phone.as_str() },
            subject_line,
            msg.message,
        );
        Some(OutboundMail {
            from: self.from_email.clone(),
            to,
            subject: format!("Nouveau message de contact: {subject_line}"),
            text,
        })
    }

    /// Spawn delivery for `msg`. Errors are logged inside the task and never returned.
    pub fn dispatch(&self, msg: &contact_message::Model) -> Option<JoinHandle<()>> {
        let mail = self.compose(msg)?;
        let transport = Arc::clone(&self.transport);
        let id = msg.id;
        Some(tokio::spawn(async move {
            let res = match mail.check_headers() {
                Ok(()) => transport.send(&mail).await,
                Err(e) => Err(e),
            };
            match res {
                Ok(()) => info!(event = "contact_notified", id, "owner notified"),
                Err(e) => warn!(event = "contact_notify_failed", id, error = %e, "owner notification suppressed"),
            }
        }))
    }
}
