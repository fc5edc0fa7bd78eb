use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use bookbot_core::catalog::Catalog;
use bookbot_fulfillment::{FulfillmentService, Intent};
use chrono::Utc;
use serde::Serialize;

pub const RUNNING_BANNER: &str = "Book Recommendation Chatbot Fulfillment is running!";

#[derive(Clone)]
pub struct HealthState {
    catalog: Arc<Catalog>,
    fulfillment: Arc<FulfillmentService>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub intents: HealthCheck,
    pub checked_at: String,
}

pub fn router(catalog: Arc<Catalog>, fulfillment: Arc<FulfillmentService>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .with_state(HealthState { catalog, fulfillment })
}

pub async fn banner() -> &'static str {
    RUNNING_BANNER
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.catalog);
    let intents = intents_check(&state.fulfillment);
    let ready = catalog.status == "ready" && intents.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "bookbot-server runtime initialized".to_string(),
        },
        catalog,
        intents,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(catalog: &Catalog) -> HealthCheck {
    let summary = catalog.summary();
    let entries: usize = summary.tables.values().sum();
    if entries == 0 {
        return HealthCheck { status: "degraded", detail: "catalog has no entries".to_string() };
    }

    HealthCheck {
        status: "ready",
        detail: format!(
            "{} classifiers, {entries} entries across {} tables",
            summary.classifiers.len(),
            summary.tables.len()
        ),
    }
}

fn intents_check(fulfillment: &FulfillmentService) -> HealthCheck {
    let dispatcher = fulfillment.dispatcher();
    let missing = Intent::ALL
        .into_iter()
        .filter(|intent| !dispatcher.handles(*intent))
        .map(Intent::as_str)
        .collect::<Vec<_>>();

    if missing.is_empty() {
        HealthCheck {
            status: "ready",
            detail: format!("{} intent handlers registered", dispatcher.handler_count()),
        }
    } else {
        HealthCheck {
            status: "degraded",
            detail: format!("no handler for {}", missing.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use bookbot_core::catalog::Catalog;
    use bookbot_fulfillment::{FulfillmentService, IntentDispatcher};

    use crate::health::{banner, health, HealthState, RUNNING_BANNER};

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::embedded().expect("embedded catalog"))
    }

    #[tokio::test]
    async fn banner_matches_the_liveness_text() {
        assert_eq!(banner().await, "Book Recommendation Chatbot Fulfillment is running!");
        assert_eq!(RUNNING_BANNER, banner().await);
    }

    #[tokio::test]
    async fn health_returns_ready_with_every_intent_registered() {
        let catalog = catalog();
        let fulfillment = Arc::new(FulfillmentService::with_catalog(catalog.clone()));

        let (status, Json(payload)) = health(State(HealthState { catalog, fulfillment })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.catalog.status, "ready");
        assert_eq!(payload.intents.detail, "8 intent handlers registered");
        assert!(!payload.checked_at.is_empty());
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_handlers_are_missing() {
        let fulfillment = Arc::new(FulfillmentService::new(IntentDispatcher::new()));

        let (status, Json(payload)) =
            health(State(HealthState { catalog: catalog(), fulfillment })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.intents.status, "degraded");
        assert!(payload.intents.detail.contains("GenreBasedRecommendationIntent"));
        assert_eq!(payload.service.status, "ready");
    }
}
