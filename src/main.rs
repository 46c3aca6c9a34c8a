use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chef_chat::{config::Config, routes, services::gemini::GeminiGenerator, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let generator = GeminiGenerator::new(config.api_key);
    info!(model = generator.model(), "Gemini client ready");

    let app = routes::create_router().with_state(AppState::shared(generator));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    info!("Gemini Chatbot running on http://localhost:{}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
