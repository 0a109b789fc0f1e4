use crate::handlers::{
    charts::{get_forecast_chart, get_indicator_chart, get_price_chart},
    company::get_company,
    health::health_check,
    prices::get_prices,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Headroom over the upstream request timeout before the whole request is cut off
const TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = state.settings.request_timeout() + TIMEOUT_MARGIN;

    let mut router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Dashboard data
        .route("/api/v1/company", get(get_company))
        .route("/api/v1/prices", get(get_prices))
        // Chart panels
        .route("/api/v1/charts/price", get(get_price_chart))
        .route("/api/v1/charts/indicator", get(get_indicator_chart))
        .route("/api/v1/charts/forecast", get(get_forecast_chart))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Built frontend, if configured
    if let Some(dir) = &state.settings.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
