use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use streamscribe::{
    create_router, AppState, Config, ConnectionMap, RemoteGateway, SessionRegistry, TranscriptSink,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "streamscribe", about = "Relays client audio to a streaming speech recognizer")]
struct Args {
    /// Path to the config file, without extension
    #[arg(long, default_value = "config/streamscribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);
    info!(
        "recognizer: {} ({}, {} Hz)",
        cfg.recognizer.endpoint, cfg.recognizer.language_code, cfg.recognizer.sample_rate_hertz
    );

    let gateway = Arc::new(RemoteGateway::from_config(&cfg.recognizer));
    let connections = Arc::new(ConnectionMap::new());
    let sink: Arc<dyn TranscriptSink> = Arc::clone(&connections) as Arc<dyn TranscriptSink>;
    let registry = Arc::new(SessionRegistry::new(gateway, sink, cfg.recognizer.clone()));

    let state = AppState {
        registry,
        connections,
    };
    let app = create_router(state, &cfg.cors)?;

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
