//! Stream Monitor — forwards a streamed reply as JSON lines.
//!
//! This is the shape of a host bridge: every classified event is written to
//! stdout as one JSON object with a `type` tag, ready to be piped into a UI
//! process. Logs go to stderr.
//!
//! ```sh
//! cargo run --example stream_monitor -- http://localhost:3000 "Write a haiku"
//! ```

use std::io::Write;
use std::time::Duration;

use a2a_chat::builders::ClientBuilder;
use a2a_chat::client::SendOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let agent_url = args.next().unwrap_or_else(|| "http://localhost:3000".to_string());
    let text = args.next().unwrap_or_else(|| "Write a haiku".to_string());

    let client = ClientBuilder::new()
        .with_client_id("a2a-stream-monitor")
        .with_stream_idle_timeout(Duration::from_secs(120))
        .build();

    let mut events = client
        .stream_events(&agent_url, &text, &SendOptions::new())
        .await?;

    let stdout = std::io::stdout();
    while let Some(event) = events.next().await {
        let event = event?;
        let mut out = stdout.lock();
        serde_json::to_writer(&mut out, &event)?;
        writeln!(out)?;
    }

    Ok(())
}
