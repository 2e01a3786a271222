use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinefibo_api::config::ServerConfig;
use cinefibo_api::router::build_app_router;
use cinefibo_api::state::AppState;
use cinefibo_fibo::{FiboConfig, FiboRenderer};
use cinefibo_pipeline::CoverageConfig;
use cinefibo_reasoning::{OpenAiReasoning, ReasoningConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinefibo_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let coverage = CoverageConfig::from_env();
    tracing::info!(
        max_concurrency = coverage.max_concurrency,
        failure_policy = ?coverage.failure_policy,
        "Loaded coverage configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = cinefibo_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    cinefibo_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    cinefibo_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External services ---
    let fibo_config = FiboConfig::from_env();
    let render = FiboRenderer::from_config(&fibo_config).expect("Failed to build FIBO client");
    tracing::info!(api_base = %fibo_config.api_base, "FIBO render client ready");

    let reasoning_config = ReasoningConfig::from_env();
    let reasoning =
        OpenAiReasoning::new(&reasoning_config).expect("Failed to build reasoning client");
    tracing::info!(model = %reasoning_config.model, "Reasoning client ready");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        render: Arc::new(render),
        reasoning: Arc::new(reasoning),
        coverage: Arc::new(coverage),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = config.bind_addr().expect("HOST must be an IP address");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
