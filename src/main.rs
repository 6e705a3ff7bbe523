use std::sync::Arc;

use apex_tutor::{terminal, App, Config, GeminiGateway};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let config = Config::from_env();
    tracing::info!(
        "Configuration - Gemini API key: {}, chat model: {}, practice model: {}",
        if config.has_api_key() { "✅" } else { "❌" },
        config.chat_model,
        config.practice_model
    );
    if !config.has_api_key() {
        tracing::warn!("GEMINI_API_KEY not found. Requests will fail until it is set.");
    }

    let gateway = Arc::new(GeminiGateway::from_config(&config));
    let (app, events) = App::new(gateway, config.fheem_transition);

    if let Err(e) = terminal::run(app, events).await {
        tracing::error!("Terminal I/O failed: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Get log level from environment or default by build mode
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "info,apex_tutor=debug,reqwest=info,hyper=info".to_string()
        } else {
            "warn,apex_tutor=info".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    // Logs go to stderr so they stay out of the chat transcript
    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("APEX starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );
    tracing::info!("Log level: {}", log_level);

    Ok(())
}
