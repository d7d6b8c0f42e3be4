use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::handlers::{
    cache::{all_stats, clear_namespace, invalidate_key, namespace_stats, sweep},
    dashboard::dashboard_stats,
    health::health_check,
    metrics::metrics_handler,
    students::{list_students, student_by_email, upsert_student},
    verify::verify_student,
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Application routes without `/metrics`.
fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Verificacion publica de certificados
        .route("/verify/{student_id}", get(verify_student))
        // Estudiantes
        .route("/students", get(list_students))
        .route("/students/by-email/{email}", get(student_by_email))
        .route("/students/{student_id}", put(upsert_student))
        .route("/dashboard/stats", get(dashboard_stats))
        // Diagnostico e invalidacion del cache
        .route("/cache/stats", get(all_stats))
        .route("/cache/stats/{namespace}", get(namespace_stats))
        .route("/cache/sweep", post(sweep))
        .route("/cache/{namespace}", delete(clear_namespace))
        .route("/cache/{namespace}/{key}", delete(invalidate_key))
        .with_state(state)
}

fn with_middleware(router: Router) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    router
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(middleware_stack)
}

/// Creates the router without the metrics endpoint.
pub fn create_router(state: AppState) -> Router {
    with_middleware(app_routes(state))
}

/// Creates the router with the given application state and metrics handle.
pub fn create_router_with_metrics(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // /metrics usa otro state
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    with_middleware(Router::new().merge(app_routes(state)).merge(metrics_router))
}

/// Runs the server until Ctrl+C or SIGTERM.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_metrics(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
