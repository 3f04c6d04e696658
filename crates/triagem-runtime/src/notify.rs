//! Best-effort decision webhook.
//!
//! Failures are logged and dropped. A notification never changes or delays
//! a decision beyond its timeout.

use serde::Serialize;
use std::time::Duration;

use triagem_core::{Decision, Process};

use crate::config::WebhookConfig;

/// Body posted to the webhook.
#[derive(Debug, Serialize)]
pub struct DecisionNotification<'a> {
    pub input: &'a Process,
    pub output: &'a Decision,
    pub provider: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            url: config.url.clone().filter(|u| !u.trim().is_empty()),
            timeout: config.timeout,
            client: reqwest::Client::new(),
        }
    }

    /// A notifier that never sends anything.
    pub fn disabled() -> Self {
        Self::new(&WebhookConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Post the notification. No-op without a URL.
    pub async fn notify(&self, payload: &DecisionNotification<'_>) {
        let Some(url) = &self.url else {
            return;
        };

        let result = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match result {
            Ok(_) => tracing::debug!(
                processo = %payload.input.numero_processo,
                "Decision webhook delivered"
            ),
            Err(e) => tracing::warn!(
                processo = %payload.input.numero_processo,
                error = %e,
                "Decision webhook failed"
            ),
        }
    }
}
