//! Chat Client — checks an A2A agent and sends it one message.
//!
//! Prints the agent's reply as it streams in, or the raw JSON reply when
//! streaming is off.
//!
//! ```sh
//! cargo run --example chat_client -- http://localhost:3000 "Tell me about Rust"
//! cargo run --example chat_client -- http://localhost:3000 "Hi" --no-stream
//! ```
//!
//! Set `RUST_LOG=a2a_chat=debug` to see every received frame.

use a2a_chat::builders::ClientBuilder;
use a2a_chat::client::{sink_fn, SendOptions, SendOutcome};
use a2a_chat::types::StreamEvent;
use a2a_chat::utils::AGENT_CARD_V3_WELL_KNOWN_PATH;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let agent_url = args.next().unwrap_or_else(|| "http://localhost:3000".to_string());
    let text = args
        .next()
        .unwrap_or_else(|| "Tell me something interesting about Rust!".to_string());
    let streaming = !args.any(|arg| arg == "--no-stream");

    let (client, card) = ClientBuilder::new()
        .with_card_fallback_path(AGENT_CARD_V3_WELL_KNOWN_PATH)
        .connect(&agent_url)
        .await?;
    println!("Chatting with: {} (v{})", card.name, card.version);
    if streaming && !card.supports_streaming() {
        println!("(agent does not advertise streaming; trying anyway)");
    }
    println!();

    let mut sink = sink_fn(|event| {
        match event {
            StreamEvent::StatusUpdate(update) => {
                if update.status_only {
                    println!("[status] {}", update.status.state);
                } else {
                    println!("[{}] {}", update.status.state, update.text);
                }
            }
            StreamEvent::ArtifactUpdate(artifact) => {
                println!("[artifact] {}", artifact.name);
                if !artifact.text_content.is_empty() {
                    println!("  {}", artifact.text_content);
                }
                if !artifact.data_content.is_empty() {
                    println!("  data: {}", serde_json::Value::Object(artifact.data_content));
                }
            }
            StreamEvent::TaskUpdate(task) => {
                println!("[task] {} in context {}", task.task_id, task.context_id);
            }
            StreamEvent::Message(message) => println!("[{}] {}", message.role, message.text),
            StreamEvent::RpcError(error) => println!("[error {}] {}", error.code, error.message),
            StreamEvent::Unclassified(frame) => {
                println!("[?] {}", frame.kind.as_deref().unwrap_or("frame without kind"))
            }
            StreamEvent::ParseError(frame) => println!("[unreadable] {}", frame.reason),
        }
        Ok(())
    });

    let options = SendOptions::new().streaming(streaming);
    match client
        .send_message(&agent_url, &text, &options, Some(&mut sink))
        .await?
    {
        SendOutcome::Streamed(summary) => {
            println!();
            println!(
                "--- {} events, final state: {} ---",
                summary.events,
                summary
                    .final_state
                    .map(|state| state.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
        }
        SendOutcome::Response(reply) => {
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
    }

    Ok(())
}
