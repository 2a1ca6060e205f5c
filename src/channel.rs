use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader, Lines};
use tracing::{info, warn};

use crate::error::ChannelError;
use crate::message::RawMessage;

/// A generated receipt ready for dispatch.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub caption: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Subscription to the incoming message stream.
#[async_trait]
pub trait MessageSource {
    /// Yield the next message, or `None` when the stream has ended.
    async fn next_message(&mut self) -> Option<RawMessage>;

    /// Re-fetch a partial message in its fully-populated shape.
    async fn hydrate(&self, msg: RawMessage) -> Result<RawMessage, ChannelError>;
}

/// Destination channel accepting rendered receipts.
#[async_trait]
pub trait ReceiptSink: Send + Sync {
    async fn send(&self, receipt: &Receipt) -> Result<(), ChannelError>;
}

/// Message source reading one `RawMessage` JSON object per line.
///
/// Malformed lines are logged and skipped so one bad message never ends
/// the subscription.
pub struct JsonLinesSource<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: AsyncRead + Unpin> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send + Sync> MessageSource for JsonLinesSource<R> {
    async fn next_message(&mut self) -> Option<RawMessage> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<RawMessage>(line) {
                        Ok(msg) => return Some(msg),
                        Err(e) => {
                            warn!(error = %e, "Skipping malformed message line");
                            continue;
                        }
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "Message stream read failed");
                    return None;
                }
            }
        }
    }

    async fn hydrate(&self, msg: RawMessage) -> Result<RawMessage, ChannelError> {
        // Lines arrive fully populated; nothing more to fetch.
        Ok(msg)
    }
}

/// Sink writing each receipt into a directory, with captions appended to a
/// `captions.log` manifest alongside the documents.
pub struct FsSink {
    out_dir: PathBuf,
}

impl FsSink {
    /// Create the output directory up front so dispatch failures are
    /// limited to individual writes.
    pub fn new(out_dir: impl AsRef<Path>) -> Result<Self, ChannelError> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }
}

#[async_trait]
impl ReceiptSink for FsSink {
    async fn send(&self, receipt: &Receipt) -> Result<(), ChannelError> {
        let path = self.out_dir.join(&receipt.filename);
        tokio::fs::write(&path, &receipt.bytes).await?;

        let mut manifest = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.out_dir.join("captions.log"))
            .await?;
        manifest
            .write_all(format!("{}\n", receipt.caption).as_bytes())
            .await?;

        info!(file = %path.display(), "Receipt written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_lines_source_yields_messages_in_order() {
        let input = concat!(
            r#"{"id":"1","channel_id":"c","author":{"id":"a"},"content":"first"}"#,
            "\n",
            "not json at all\n",
            "\n",
            r#"{"id":"2","channel_id":"c","author":{"id":"a","bot":true},"content":"second"}"#,
            "\n",
        );
        let mut source = JsonLinesSource::new(input.as_bytes());

        let first = source.next_message().await.unwrap();
        assert_eq!(first.id, "1");
        assert_eq!(first.content, "first");

        let second = source.next_message().await.unwrap();
        assert_eq!(second.id, "2");
        assert!(second.author.bot);

        assert!(source.next_message().await.is_none());
    }

    #[tokio::test]
    async fn fs_sink_writes_document_and_caption() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path().join("out")).unwrap();

        let receipt = Receipt {
            caption: "📦 Order sticker for Ana's Order (ORD-1)".to_string(),
            filename: "ORD-1.docx".to_string(),
            bytes: vec![1, 2, 3],
        };
        sink.send(&receipt).await.unwrap();

        let written = std::fs::read(dir.path().join("out/ORD-1.docx")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        let manifest = std::fs::read_to_string(dir.path().join("out/captions.log")).unwrap();
        assert_eq!(manifest, "📦 Order sticker for Ana's Order (ORD-1)\n");
    }
}
