use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use tenx_cards::services::OpenRouterClient;
use tenx_cards::{AppState, config, create_app, db, run_migrations};

#[tokio::main]
async fn main() {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    if std::fs::metadata(".env").is_ok() {
        info!("Loading .env file");
        dotenv::dotenv().ok();
    }

    let args = config::CliArgs::parse();
    let config = config::get_config(args);

    // Initialize the database pool and bring the schema up to date
    let pool = Arc::new(db::init_pool(&config.database_url));
    {
        let mut conn = pool.get().expect("Failed to get database connection");
        run_migrations(&mut conn);
    }

    let state = Arc::new(AppState {
        pool,
        ai: OpenRouterClient::new(
            config.openrouter_api_key.clone(),
            config.openrouter_model.clone(),
        ),
    });

    // Build our application with routes; the browser client runs on its own
    // origin, so CORS stays open
    let app = create_app(state).layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
