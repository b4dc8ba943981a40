use crate::health;
use crate::api::medicines::medicines::{
    create_medicine, delete_medicine, get_medicine, list_medicines, update_medicine,
};

use rx_stream::AppState;

use axum::{
    Router,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        // Live monitor stream
        .route("/api/v1/{subdomain}/monitor", get(rx_stream::monitor_handler))
        // Medicine REST API
        .route(
            "/api/v1/{subdomain}/medicines",
            get(list_medicines).post(create_medicine),
        )
        .route(
            "/api/v1/{subdomain}/medicines/{id}",
            get(get_medicine)
                .put(update_medicine)
                .delete(delete_medicine),
        )
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check));

    // Prometheus endpoint (absent in tests that install no recorder)
    if let Some(handle) = prometheus {
        router = router.route(
            "/metrics",
            get(move || std::future::ready(handle.render())),
        );
    }

    router
        // Add shared state
        .with_state(state)
        // CORS middleware (cross-origin reads permitted on the stream)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
