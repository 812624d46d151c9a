//! AcadFlow API Gateway
//!
//! The main entry point for all external API requests.
//! Handles:
//! - Authentication and role gating
//! - Request routing
//! - Observability (logging, metrics, tracing)

mod extract;
mod handlers;
mod response;

use acadflow_common::{
    auth::JwtManager,
    config::AppConfig,
    db::DbPool,
    metrics::{self, RequestMetrics},
};
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub jwt: Arc<JwtManager>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting AcadFlow API Gateway v{}", acadflow_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let config = Arc::new(config);

    // Initialize metrics
    if config.observability.metrics_port > 0 {
        PrometheusBuilder::new()
            .with_http_listener(SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port)))
            .install()?;
    }
    metrics::register_metrics();

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Token manager
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_secs,
    ));

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        jwt,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Auth endpoints
        .route("/auth/login", post(handlers::auth::login))

        // User endpoints
        .route("/users", get(handlers::users::list_users).post(handlers::users::create_user))
        .route("/users/supervisors", get(handlers::users::list_supervisors))

        // FYP endpoints
        .route("/fyps", get(handlers::fyps::list_fyps))
        .route("/fyps/my", get(handlers::fyps::my_fyps))
        .route("/fyps/idea", post(handlers::fyps::submit_idea))
        .route("/fyps/{id}", get(handlers::fyps::get_fyp))
        .route("/fyps/{id}/supervisor", put(handlers::fyps::assign_supervisor))
        .route("/fyps/{id}/documents", post(handlers::fyps::upload_document))
        .route("/fyps/{id}/stage", put(handlers::fyps::update_stage))
        .route("/fyps/{id}/plagiarism", post(handlers::fyps::upload_plagiarism_report))
        .route("/fyps/{id}/evaluations", get(handlers::evaluations::fyp_evaluations))

        // Clearance endpoints
        .route("/clearances", get(handlers::clearances::list_clearances))
        .route("/clearances/initiate", post(handlers::clearances::initiate))
        .route("/clearances/my", get(handlers::clearances::my_clearance))
        .route("/clearances/{id}", get(handlers::clearances::get_clearance))
        .route("/clearances/{id}/approve", put(handlers::clearances::approve_department))
        .route("/clearances/{id}/reject", put(handlers::clearances::reject_department))

        // Evaluation endpoints
        .route("/evaluations", post(handlers::evaluations::submit_evaluation))
        .route("/evaluations/my", get(handlers::evaluations::my_evaluations))

        // Notification endpoints
        .route("/notifications", get(handlers::notifications::my_notifications))
        .route("/notifications/unread-count", get(handlers::notifications::unread_count))
        .route("/notifications/mark-all-read", put(handlers::notifications::mark_all_read))
        .route("/notifications/{id}/read", put(handlers::notifications::mark_read))

        // Admin endpoints
        .route("/admin/analytics", get(handlers::admin::analytics));

    // Compose the app
    Router::new()
        .nest("/api/v1", api_routes)
        .layer(axum::middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Record request count and latency for every request
async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let tracker = RequestMetrics::start(&method, &path);
    let response = next.run(request).await;
    tracker.finish(response.status().as_u16());

    response
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
