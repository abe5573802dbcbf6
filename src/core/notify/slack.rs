//! Slack incoming-webhook delivery.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::core::models::cost::Report;
use crate::core::notify::{validate_endpoint, Notifier, NotifyError};

const ATTACHMENT_COLOR: &str = "#36a64f";

pub struct SlackNotifier {
    endpoint_url: String,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Create a notifier for a webhook URL. Only HTTPS endpoints are accepted.
    pub fn new(endpoint_url: String) -> Result<Self, NotifyError> {
        validate_endpoint(&endpoint_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            endpoint_url,
            client,
        })
    }

    fn format_payload(report: &Report) -> SlackPayload<'_> {
        SlackPayload {
            attachments: vec![SlackAttachment {
                color: ATTACHMENT_COLOR,
                pretext: &report.title,
                text: &report.detail,
            }],
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, report: &Report) -> Result<(), NotifyError> {
        let payload = Self::format_payload(report);
        debug!(channel = "slack", title = %report.title, "Posting report");

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        debug!(channel = "slack", status = status.as_u16(), "Webhook responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SlackPayload<'a> {
    attachments: Vec<SlackAttachment<'a>>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment<'a> {
    color: &'static str,
    pretext: &'a str,
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notify::deliver;

    fn report() -> Report {
        Report {
            title: "06/01～06/14の請求額は、123.46 USDです。".to_string(),
            detail: "- S3/DataTransfer: 5.56 USD (10.0 GB)".to_string(),
        }
    }

    #[test]
    fn payload_puts_title_in_pretext_and_detail_in_text() {
        let report = report();
        let payload = serde_json::to_value(SlackNotifier::format_payload(&report)).unwrap();
        let attachment = &payload["attachments"][0];
        assert_eq!(attachment["color"], "#36a64f");
        assert_eq!(attachment["pretext"], report.title.as_str());
        assert_eq!(attachment["text"], report.detail.as_str());
        assert_eq!(payload["attachments"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn payload_with_empty_detail_keeps_text_field() {
        let report = Report {
            title: "t".to_string(),
            detail: String::new(),
        };
        let payload = serde_json::to_value(SlackNotifier::format_payload(&report)).unwrap();
        assert_eq!(payload["attachments"][0]["text"], "");
    }

    #[test]
    fn new_rejects_plain_http() {
        assert!(matches!(
            SlackNotifier::new("http://hooks.slack.com/services/x".to_string()),
            Err(NotifyError::InsecureEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_webhook_is_not_fatal() {
        // Nothing listens on port 9 locally; the connection is refused.
        let notifier = SlackNotifier::new("https://127.0.0.1:9/services/x".to_string()).unwrap();
        assert!(notifier.send(&report()).await.is_err());
        assert!(!deliver(&notifier, &report()).await);
    }
}
