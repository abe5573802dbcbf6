pub mod slack;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::models::cost::Report;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Webhook returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Endpoint must use HTTPS, got: {0}")]
    InsecureEndpoint(String),
}

/// A channel a rendered report can be posted to.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, report: &Report) -> Result<(), NotifyError>;
}

/// Make one delivery attempt. Failures are logged, never returned.
pub async fn deliver(notifier: &dyn Notifier, report: &Report) -> bool {
    match notifier.send(report).await {
        Ok(()) => {
            info!(channel = notifier.name(), "Report delivered");
            true
        }
        Err(e) => {
            warn!(channel = notifier.name(), error = %e, "Report delivery failed");
            false
        }
    }
}

/// Reject anything but HTTPS before a webhook secret goes over the wire.
pub fn validate_endpoint(url: &str) -> Result<(), NotifyError> {
    if !url.starts_with("https://") {
        return Err(NotifyError::InsecureEndpoint(url.to_string()));
    }
    Ok(())
}
