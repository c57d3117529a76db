use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/staff", get(handlers::staff))
        .route("/api/staff/export.csv", get(handlers::staff_export))
        .route("/api/staff/chart/:file", get(handlers::staff_chart))
        .route("/api/institutions", get(handlers::institutions))
        .route("/api/institutions/export.csv", get(handlers::institutions_export))
        .route("/api/worship/:kind", get(handlers::worship))
        .route("/api/worship/:kind/export.csv", get(handlers::worship_export))
        .route("/api/marriage", get(handlers::marriage))
        .route("/api/news", get(handlers::news))
        .route("/api/locations", get(handlers::locations))
        .route("/api/qibla", get(handlers::qibla))
        .route("/api/prayer-times", get(handlers::prayer_times))
        .route("/api/services", get(handlers::services))
        .route("/api/contact", get(handlers::contact))
        .with_state(state)
}
