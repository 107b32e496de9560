//! Best-effort broadcast of alerts to every current subscriber

use crate::alerts::format::{AlertFormatter, DefaultFormatter, RenderedMessage};
use crate::error::Result;
use crate::metrics::Metrics;
use crate::models::signal::SignalEvent;
use crate::subscribers::SubscriberStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outbound chat transport
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, chat_id: i64, message: &RenderedMessage) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

pub struct AlertDispatcher {
    sender: Arc<dyn MessageSender>,
    subscribers: SubscriberStore,
    formatter: Arc<dyn AlertFormatter>,
    metrics: Option<Arc<Metrics>>,
}

impl AlertDispatcher {
    pub fn new(sender: Arc<dyn MessageSender>, subscribers: SubscriberStore) -> Self {
        Self {
            sender,
            subscribers,
            formatter: Arc::new(DefaultFormatter),
            metrics: None,
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn AlertFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Render `event` and send it to everyone subscribed right now
    pub async fn dispatch(&self, event: &SignalEvent) -> DispatchReport {
        let message = self.formatter.render(event);
        let report = self.broadcast(&message).await;

        info!(
            symbol = %event.symbol,
            kind = %event.kind,
            rsi = event.value,
            delivered = report.delivered,
            failed = report.failed,
            "Alert {} {} sent to {} subscribers",
            event.kind,
            event.symbol,
            report.delivered
        );
        report
    }

    async fn broadcast(&self, message: &RenderedMessage) -> DispatchReport {
        let recipients = self.subscribers.snapshot().await;
        if let Some(metrics) = &self.metrics {
            metrics.subscribers.set(recipients.len() as i64);
        }

        let mut report = DispatchReport::default();
        for chat_id in recipients {
            match self.sender.send_message(chat_id, message).await {
                Ok(()) => {
                    debug!(chat_id, "Delivered message");
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!(chat_id, error = %e, "Failed to deliver message to {}", chat_id);
                    report.failed += 1;
                    if let Some(metrics) = &self.metrics {
                        metrics.alert_deliveries_failed_total.inc();
                    }
                }
            }
        }
        report
    }
}
