use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use order_receipts::channel::{MessageSource, Receipt, ReceiptSink};
use order_receipts::config::{Channels, Config, ReceiptConfig};
use order_receipts::error::ChannelError;
use order_receipts::message::{Author, Embed, RawMessage};

pub const SOURCE_CHANNEL: &str = "orders";

pub fn test_config() -> Config {
    Config {
        channels: Channels {
            source: SOURCE_CHANNEL.to_string(),
            destination: "receipts".to_string(),
        },
        receipt: ReceiptConfig {
            qr_url: "https://store.example".to_string(),
            output_dir: "receipts".to_string(),
        },
    }
}

/// A complete notification body for the given customer and order id.
pub fn order_body(first_name: &str, order_id: &str) -> String {
    format!(
        "🛒 New Order Received\n\
         👤 First Name: {first_name}\n\
         📧 Email: a@x.com\n\
         📍 Location: City\n\
         🛍️ Cart Items:\n\
         • Shirt\n\
         • Hat\n\
         💳 Payment Method: Card\n\
         💰 Total Price: $40\n\
         🆔 Order ID: {order_id}"
    )
}

pub fn plain_message(id: &str, channel: &str, body: &str) -> RawMessage {
    RawMessage {
        id: id.to_string(),
        channel_id: channel.to_string(),
        author: Author {
            id: "customer".to_string(),
            bot: false,
            webhook: false,
        },
        content: body.to_string(),
        embeds: vec![],
        partial: false,
    }
}

pub fn embed_message(id: &str, channel: &str, description: &str) -> RawMessage {
    let mut msg = plain_message(id, channel, "");
    msg.embeds = vec![Embed {
        description: Some(description.to_string()),
        fields: vec![],
    }];
    msg
}

/// In-memory subscription backed by a queue of scripted messages.
pub struct ScriptedSource {
    queue: VecDeque<RawMessage>,
    pub fail_hydration: bool,
}

impl ScriptedSource {
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            queue: messages.into(),
            fail_hydration: false,
        }
    }
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn next_message(&mut self) -> Option<RawMessage> {
        self.queue.pop_front()
    }

    async fn hydrate(&self, mut msg: RawMessage) -> Result<RawMessage, ChannelError> {
        if self.fail_hydration {
            return Err(ChannelError::Hydrate(
                "message no longer available".to_string(),
            ));
        }
        msg.partial = false;
        Ok(msg)
    }
}

/// Records every dispatched receipt; can be scripted to reject one order.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub sent: Arc<Mutex<Vec<Receipt>>>,
    pub fail_filename: Option<String>,
}

impl RecordingSink {
    pub fn failing_for(filename: &str) -> Self {
        Self {
            sent: Arc::default(),
            fail_filename: Some(filename.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<Receipt> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReceiptSink for RecordingSink {
    async fn send(&self, receipt: &Receipt) -> Result<(), ChannelError> {
        if self.fail_filename.as_deref() == Some(receipt.filename.as_str()) {
            return Err(ChannelError::Send("destination unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(receipt.clone());
        Ok(())
    }
}
