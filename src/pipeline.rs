use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::channel::{MessageSource, Receipt, ReceiptSink};
use crate::config::Config;
use crate::heuristics;
use crate::message::RawMessage;
use crate::renderer;

/// Watches the order channel and republishes rendered receipts.
///
/// Each qualifying message runs through classify, extract, render and
/// dispatch in its own task; records and buffers are task-local, so
/// dispatch order across concurrent messages is unspecified.
pub struct OrderProcessor<S> {
    config: Arc<Config>,
    sink: Arc<S>,
}

impl<S: ReceiptSink + 'static> OrderProcessor<S> {
    pub fn new(config: Config, sink: S) -> Self {
        Self {
            config: Arc::new(config),
            sink: Arc::new(sink),
        }
    }

    /// Consume the subscription until it ends. No per-message failure may
    /// stop the loop or affect other messages.
    pub async fn run<M: MessageSource>(&self, mut source: M) {
        let mut tasks = JoinSet::new();

        while let Some(msg) = source.next_message().await {
            if msg.channel_id != self.config.channels.source {
                continue;
            }
            // Webhook posts carry the bot flag but are legitimate orders.
            if msg.author.bot && !msg.author.webhook {
                continue;
            }

            let msg = if msg.partial {
                let msg_id = msg.id.clone();
                match source.hydrate(msg).await {
                    Ok(full) => full,
                    Err(e) => {
                        warn!(id = %msg_id, error = %e, "Could not rehydrate partial message");
                        continue;
                    }
                }
            } else {
                msg
            };

            let config = Arc::clone(&self.config);
            let sink = Arc::clone(&self.sink);
            tasks.spawn(async move {
                process_message(&msg, &config, sink.as_ref()).await;
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Receipt task aborted");
            }
        }
    }
}

async fn process_message<S: ReceiptSink>(msg: &RawMessage, config: &Config, sink: &S) {
    let content = msg.normalized_content();
    if !heuristics::is_order(&content) {
        debug!(id = %msg.id, "Not an order notification");
        return;
    }

    let Some(record) = heuristics::extract_order(&content) else {
        info!(id = %msg.id, "Order markers present but mandatory fields missing");
        return;
    };

    let (filled, total) = record.coverage();
    info!(
        order_id = %record.order_id,
        filled,
        total,
        items = record.items.len(),
        "Order extracted"
    );

    let bytes = match renderer::render(&record, &config.receipt.qr_url) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(order_id = %record.order_id, error = %e, "Receipt rendering failed");
            return;
        }
    };

    let receipt = Receipt {
        caption: format!(
            "📦 Order sticker for {}'s Order ({})",
            record.first_name, record.order_id
        ),
        filename: format!("{}.docx", record.order_id),
        bytes,
    };

    // A failed dispatch is final: logged, never retried or re-queued.
    if let Err(e) = sink.send(&receipt).await {
        error!(
            order_id = %record.order_id,
            channel = %config.channels.destination,
            error = %e,
            "Receipt dispatch failed"
        );
        return;
    }

    info!(
        order_id = %record.order_id,
        channel = %config.channels.destination,
        "Receipt dispatched"
    );
}
