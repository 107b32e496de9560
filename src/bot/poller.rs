//! Long-polling loop feeding updates to the handler

use crate::bot::handlers::BotHandler;
use crate::error::BotError;
use crate::services::telegram::TelegramClient;
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{error, info, warn};

const POLL_TIMEOUT_SECS: u64 = 30;
const FAILURE_PAUSE: Duration = Duration::from_secs(5);

pub struct UpdatePoller {
    client: TelegramClient,
    handler: BotHandler,
    offset: i64,
}

impl UpdatePoller {
    pub fn new(client: TelegramClient, handler: BotHandler) -> Self {
        Self {
            client,
            handler,
            offset: 0,
        }
    }

    /// Poll and dispatch updates forever
    pub async fn run(mut self) {
        info!("UpdatePoller: started");
        loop {
            self.poll_once().await;
        }
    }

    /// Fetch one batch of updates and handle them in order
    pub async fn poll_once(&mut self) {
        let offset = self.offset;
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(30))
            .with_max_times(5);

        let updates = (|| self.client.get_updates(offset, POLL_TIMEOUT_SECS))
            .retry(backoff)
            .notify(|e: &BotError, after: Duration| {
                warn!(
                    error = %e,
                    retry_in_ms = after.as_millis() as u64,
                    "getUpdates failed, retrying"
                );
            })
            .await;

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                error!(error = %e, "getUpdates keeps failing, pausing");
                tokio::time::sleep(FAILURE_PAUSE).await;
                return;
            }
        };

        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            let update_id = update.update_id;
            if let Err(e) = self.handler.handle_update(update).await {
                warn!(update_id, error = %e, "Failed to handle update");
            }
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}
