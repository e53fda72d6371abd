use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    handler::Handler,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, require_admin_auth, AuthState, RequestId};
use crate::store::StateStore;
use picks_data::OverrideState;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" => StatusCode::BAD_REQUEST,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

#[derive(Debug, Serialize)]
struct PutStateBody {
    ok: bool,
    mode: &'static str,
    state: OverrideState,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/state",
            get(get_state).put(put_state.layer(axum::middleware::from_fn_with_state(
                auth,
                require_admin_auth,
            ))),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let store = if state.store.file_backed() {
        "file"
    } else {
        "memory"
    };
    #[derive(Serialize)]
    struct Health {
        data: HealthData,
        meta: ResponseMeta,
    }
    Json(Health {
        data: HealthData {
            status: "ok",
            store,
        },
        meta,
    })
}

/// The current override document. Consumers must see every save
/// immediately, so responses are never cacheable.
async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(state.store.get().await),
    )
}

/// Full-document replace. Only outright invalid JSON is rejected;
/// malformed sub-fields fall back to defaults so a partially broken admin
/// payload still saves the rest.
async fn put_state(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::new(req_id.0.clone(), "bad_request", "request body must be JSON"))?;

    let (incoming, discarded) = OverrideState::from_value_lossy(&value);
    if !discarded.is_empty() {
        tracing::warn!(request_id = %req_id.0, fields = ?discarded,
            "discarded malformed override fields from write");
    }

    let (saved, mode) = state.store.replace(incoming).await;
    tracing::info!(request_id = %req_id.0, mode = mode.as_str(),
        product_overrides = saved.product_overrides.len(), "override state replaced");

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(PutStateBody {
            ok: true,
            mode: mode.as_str(),
            state: saved,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let store = Arc::new(StateStore::open(None).await);
        let auth = AuthState::for_tests("admin", Some("s3cret"), &["tok-a"]);
        build_app(AppState { store }, auth)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn get_state_returns_the_empty_default_uncached() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/state")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-store".as_slice())
        );
        let body = body_json(response).await;
        assert_eq!(body["productOverrides"], serde_json::json!({}));
        assert_eq!(body["updatedAt"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn put_without_credentials_is_challenged() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/state")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .map(|v| v.as_bytes()),
            Some(b"Basic realm=\"picks-admin\"".as_slice())
        );
    }

    #[tokio::test]
    async fn put_with_basic_auth_saves_and_get_round_trips() {
        let store = Arc::new(StateStore::open(None).await);
        let auth = AuthState::for_tests("admin", Some("s3cret"), &[]);
        let app = build_app(AppState { store }, auth);

        let payload = serde_json::json!({
            "productOverrides": { "tech-01": { "price": 149 } }
        });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/state")
                    // base64("admin:s3cret")
                    .header(header::AUTHORIZATION, "Basic YWRtaW46czNjcmV0")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], serde_json::json!(true));
        assert_eq!(body["mode"], serde_json::json!("saved_in_memory_only"));
        assert_eq!(body["state"]["productOverrides"]["tech-01"]["price"], 149.0);
        assert!(body["state"]["updatedAt"].is_string());

        let read = app
            .oneshot(
                Request::builder()
                    .uri("/api/state")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let body = body_json(read).await;
        assert_eq!(body["productOverrides"]["tech-01"]["price"], 149.0);
    }

    #[tokio::test]
    async fn put_with_bearer_token_is_accepted() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/state")
                    .header(header::AUTHORIZATION, "Bearer tok-a")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn put_rejects_invalid_json_outright() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/state")
                    .header(header::AUTHORIZATION, "Bearer tok-a")
                    .body(Body::from("{ not json"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], serde_json::json!("bad_request"));
    }

    #[tokio::test]
    async fn put_tolerates_malformed_subfields() {
        let app = test_app().await;
        let payload = serde_json::json!({
            "weeklyConfigOverride": ["wrong", "shape"],
            "productOverrides": { "tech-02": { "title": "Kept" } }
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/state")
                    .header(header::AUTHORIZATION, "Bearer tok-a")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["state"]["weeklyConfigOverride"], serde_json::Value::Null);
        assert_eq!(body["state"]["productOverrides"]["tech-02"]["title"], "Kept");
    }

    #[tokio::test]
    async fn other_methods_on_state_are_rejected() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/state")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_reports_the_store_mode() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["store"], "memory");
    }
}
