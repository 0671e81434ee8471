//! HTTP router for the citizen and staff surfaces.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//! Layers (outermost → innermost): CORS → access log → handler.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router over a shared `CoreState`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/home", get(endpoints::home::home))
        .route("/reference", get(endpoints::home::reference_data))
        .route("/privacy", get(endpoints::home::privacy))
        // Booking wizard
        .route("/booking", post(endpoints::booking::start))
        .route(
            "/booking/:id",
            get(endpoints::booking::view).delete(endpoints::booking::abandon),
        )
        .route("/booking/:id/consent", post(endpoints::booking::consent))
        .route("/booking/:id/location", post(endpoints::booking::location))
        .route("/booking/:id/clinic", post(endpoints::booking::clinic))
        .route("/booking/:id/slot", post(endpoints::booking::slot))
        .route("/booking/:id/patient", post(endpoints::booking::patient))
        .route("/booking/:id/advance", post(endpoints::booking::advance))
        .route("/booking/:id/back", post(endpoints::booking::back))
        .route("/booking/:id/triage", post(endpoints::booking::triage))
        .route("/booking/:id/receipt", get(endpoints::booking::receipt))
        // Self-service
        .route("/lookup", post(endpoints::lookup::search))
        .route("/lookup/cancel", post(endpoints::lookup::cancel))
        .route("/lookup/complete", post(endpoints::lookup::complete))
        .route("/lookup/rate", post(endpoints::lookup::rate))
        .route("/lookup/erase", post(endpoints::lookup::erase))
        // Staff dashboard
        .route("/dashboard/summary", get(endpoints::dashboard::summary))
        .route(
            "/dashboard/clinics",
            get(endpoints::dashboard::list_clinics).post(endpoints::dashboard::create_clinic),
        )
        .route(
            "/dashboard/clinics/:id",
            put(endpoints::dashboard::update_clinic),
        )
        .route(
            "/dashboard/doctors",
            get(endpoints::dashboard::list_doctors).post(endpoints::dashboard::create_doctor),
        )
        .route(
            "/dashboard/doctors/:id/toggle",
            post(endpoints::dashboard::toggle_doctor),
        )
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(cors)
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
