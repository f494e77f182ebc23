//! Oracle chat - ask a persona-framed question, read the answer
//!
//! Reads one question per line from stdin and prints the conversation
//! after each answer. Logs go to stderr.

mod conversation;
mod llm;
mod persona;
mod render;
mod store;

use llm::LlmConfig;
use persona::Persona;
use store::{ConversationStore, ServiceModelClient};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Configuration
    let config = LlmConfig::from_env()?;
    let service = config.build_service()?;
    let persona = config
        .persona
        .as_deref()
        .map_or_else(Persona::oracle, Persona::acting_as);

    tracing::info!(model = %service.model_id(), "Model client initialized");

    let store = ConversationStore::new(
        ServiceModelClient::new(service, config.generation.clone()),
        persona,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let request_id = store.submit_question(question)?;
        if store.is_pending() {
            stdout
                .write_all(render::render_state(&store.current_state()).as_bytes())
                .await?;
            stdout.flush().await?;
        }

        let state = store.settled().await;
        if let Some(error) = state.error_text() {
            tracing::warn!(request_id = %request_id, error = %error, "Question failed");
        }
        stdout
            .write_all(render::render_state(&state).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    tracing::info!("Input closed, exiting");
    Ok(())
}

fn init_logging() {
    let json = std::env::var("ORACLE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oracle_chat=info".into()),
        )
        .with(fmt_layer)
        .init();
}
