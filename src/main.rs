use order_receipts::channel::{FsSink, JsonLinesSource};
use order_receipts::config::Config;
use order_receipts::pipeline::OrderProcessor;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter("info")
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ".config/order_receipts.toml".to_string());
    let config = Config::load(&config_path)?;
    info!(
        source = %config.channels.source,
        destination = %config.channels.destination,
        "Watching for order notifications"
    );

    let sink = FsSink::new(&config.receipt.output_dir)?;
    let source = JsonLinesSource::new(tokio::io::stdin());

    let processor = OrderProcessor::new(config, sink);
    processor.run(source).await;

    info!("Message stream ended");
    Ok(())
}
