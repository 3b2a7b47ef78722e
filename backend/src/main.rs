use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nexa_companion::config::{Config, LoggingConfig};
use nexa_companion::services::llm::{CompletionOptions, HttpInferenceClient};
use nexa_companion::services::{ChatService, InMemoryConversationStore};
use nexa_companion::{AppState, build_router};

#[derive(Parser, Debug)]
#[command(name = "nexa-companion", version, about = "NexaHealth AI companion backend")]
struct Args {
    /// Path to the configuration file (default: conf/config.toml lookup)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    // Guard keeps the non-blocking file writer alive for the process lifetime
    let _guard = init_tracing(&config.logging);

    let client = Arc::new(HttpInferenceClient::new(&config.inference));
    let store = Arc::new(InMemoryConversationStore::new());
    let options = CompletionOptions {
        model: config.inference.model.clone(),
        temperature: config.inference.temperature,
        max_tokens: config.inference.max_tokens,
        timeout: config.inference.timeout(),
    };
    let chat_service = ChatService::new(client, store, options);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, chat_service));
    let app = build_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("NexaHealth Companion listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let stdout_layer = tracing_subscriber::fmt::layer();

    match &logging.file {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => std::path::Path::new("."),
            };
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "nexa-companion.log".to_string());

            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();
            Some(guard)
        },
        None => {
            tracing_subscriber::registry().with(filter).with(stdout_layer).init();
            None
        },
    }
}
