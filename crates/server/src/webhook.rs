use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bookbot_core::errors::{ApplicationError, InterfaceError};
use bookbot_fulfillment::{wire, DispatchContext, FulfillmentService, WebhookResponse};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct WebhookState {
    fulfillment: Arc<FulfillmentService>,
}

#[derive(Debug)]
pub struct WebhookRejection(pub InterfaceError);

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = match &self.0 {
            InterfaceError::BadRequest { message, .. } | InterfaceError::Internal { message, .. } => {
                message.clone()
            }
        };

        (
            status,
            Json(json!({
                "error": self.0.user_message(),
                "detail": detail,
                "correlation_id": self.0.correlation_id(),
            })),
        )
            .into_response()
    }
}

pub fn router(fulfillment: Arc<FulfillmentService>) -> Router {
    Router::new().route("/webhook", post(webhook)).with_state(WebhookState { fulfillment })
}

pub async fn webhook(
    State(state): State<WebhookState>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookRejection> {
    let request = match wire::decode(&body) {
        Ok(request) => request,
        Err(error) => {
            let correlation_id = Uuid::new_v4().to_string();
            warn!(
                event_name = "ingress.webhook.rejected",
                correlation_id = %correlation_id,
                error = %error,
                "rejected malformed webhook request"
            );
            return Err(WebhookRejection(ApplicationError::from(error).into_interface(correlation_id)));
        }
    };

    let correlation_id =
        request.response_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    info!(
        event_name = "ingress.webhook.received",
        correlation_id = %correlation_id,
        intent = %request.intent,
        session = request.session.as_deref().unwrap_or("unknown"),
        parameters = request.parameters.len(),
        contexts = request.contexts.len(),
        "received webhook request"
    );

    let ctx = DispatchContext { correlation_id };
    match state.fulfillment.fulfill(&request, &ctx) {
        Ok(fulfilled) => Ok(Json(fulfilled.webhook)),
        Err(error) => {
            warn!(
                event_name = "fulfillment.intent.unhandled",
                correlation_id = %ctx.correlation_id,
                intent = %request.intent,
                error = %error,
                "answering unhandled intent with the generic fallback"
            );
            Ok(Json(FulfillmentService::unhandled()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use bookbot_core::catalog::Catalog;
    use bookbot_fulfillment::{FulfillmentService, UNHANDLED_INTENT_TEXT};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::webhook::router;

    const SESSION: &str = "projects/bookbot/agent/sessions/http-1";

    fn app() -> Router {
        let catalog = Arc::new(Catalog::embedded().expect("embedded catalog"));
        router(Arc::new(FulfillmentService::with_catalog(catalog)))
    }

    async fn post(body: impl Into<Body>) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body.into())
                    .expect("request"),
            )
            .await
            .expect("response");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    fn request(intent: &str, parameters: Value) -> String {
        json!({
            "responseId": "resp-http-1",
            "session": SESSION,
            "queryResult": {
                "queryText": "hello",
                "parameters": parameters,
                "intent": { "displayName": intent }
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn webhook_answers_with_text_chips_and_contexts() {
        let (status, body) =
            post(request("GenreBasedRecommendationIntent", json!({ "genre": "fantasy" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["fulfillmentText"],
            "Great choice! Do you prefer books that are easy, moderate, or challenging to read?"
        );
        assert_eq!(
            body["fulfillmentMessages"][1]["quickReplies"]["quickReplies"],
            json!(["Easy", "Moderate", "Challenging"])
        );
        assert_eq!(
            body["outputContexts"][0],
            json!({
                "name": format!("{SESSION}/contexts/genre_selected"),
                "lifespanCount": 5,
                "parameters": { "genre": "fantasy" }
            })
        );
    }

    #[tokio::test]
    async fn unhandled_intent_gets_the_generic_fallback() {
        let (status, body) = post(request("Default Fallback Intent", json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fulfillmentText"], UNHANDLED_INTENT_TEXT);
        assert!(body.get("outputContexts").is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, body) = post("{\"queryResult\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
        assert!(body["detail"].as_str().expect("detail").contains("not a valid webhook request"));
        assert!(!body["correlation_id"].as_str().expect("correlation id").is_empty());
    }

    #[tokio::test]
    async fn missing_display_name_is_a_bad_request() {
        let body = json!({ "responseId": "resp-x", "queryResult": { "queryText": "hi" } }).to_string();

        let (status, body) = post(body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().expect("detail").contains("queryResult.intent.displayName"));
    }
}
