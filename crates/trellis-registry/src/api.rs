//! HTTP API for the registry.
//!
//! Handlers are thin: they parse the request, run the registry call on the
//! blocking pool (RocksDB I/O and the write lock are synchronous), and map
//! registry errors to status codes.

use crate::credential::hash_credential;
use crate::error::Error;
use crate::models::{DownlineReport, MemberView, RegistrationRequest, SponsorStatus};
use crate::registry::Registry;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trellis_tree::Side;

type AppState = Arc<Registry>;

/// Build the API router.
pub fn build_router(registry: Arc<Registry>) -> Router {
    // CORS layer for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/members", get(list_members))
        .route("/api/members/register", post(register))
        .route("/api/members/verify-sponsor/:code", get(verify_sponsor))
        .route("/api/members/:code", get(get_member))
        .route("/api/members/:code/downline", get(get_downline))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(registry)
}

/// Error body returned by every failing endpoint.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_)
            | Error::SponsorNotFound(_)
            | Error::DuplicateEmail(_)
            | Error::PositionUnavailable(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if self.0.is_internal() {
            tracing::error!("request failed: {}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Run a registry call off the async executor.
async fn blocking<T, F>(registry: AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Registry) -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&registry))
        .await
        .map_err(|e| ApiError(Error::Storage(format!("registry task failed: {e}"))))?
        .map_err(ApiError)
}

// --- Health ---

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

// --- Registration ---

#[derive(Debug, Deserialize)]
struct RegisterBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    mobile: String,
    #[serde(default)]
    password: String,
    sponsor_code: Option<String>,
    #[serde(default)]
    position: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    message: &'static str,
    member_code: String,
    /// Placement parent, or `"ROOT"` for the first member
    placed_under: String,
    position: Option<Side>,
    member: MemberView,
}

async fn register(
    State(registry): State<AppState>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(body) = payload?;
    if body.password.is_empty() {
        return Err(Error::Validation("password is required".into()).into());
    }
    let position: Side = body.position.parse().map_err(Error::from)?;

    let (registration, member) = blocking(registry, move |r| {
        let req = RegistrationRequest {
            name: body.name,
            email: body.email,
            mobile: body.mobile,
            credential: hash_credential(&body.password)?,
            sponsor_code: body.sponsor_code,
            position,
        };
        let registration = r.register(req)?;
        let member = r.get_member(&registration.member_code)?;
        Ok((registration, member))
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Member registered successfully",
            member_code: registration.member_code,
            placed_under: registration.placed_under.unwrap_or_else(|| "ROOT".to_string()),
            position: registration.position,
            member,
        }),
    ))
}

// --- Lookups ---

#[derive(Debug, Serialize)]
struct VerifySponsorResponse {
    valid: bool,
    sponsor: SponsorStatus,
}

async fn verify_sponsor(
    State(registry): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    match blocking(registry, move |r| r.resolve_sponsor(&code)).await {
        Ok(sponsor) => Json(VerifySponsorResponse { valid: true, sponsor }).into_response(),
        Err(ApiError(Error::NotFound(_))) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "valid": false, "error": "Invalid sponsor code" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn list_members(State(registry): State<AppState>) -> Result<Json<Vec<MemberView>>, ApiError> {
    Ok(Json(blocking(registry, |r| r.list_members()).await?))
}

async fn get_member(
    State(registry): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MemberView>, ApiError> {
    Ok(Json(blocking(registry, move |r| r.get_member(&code)).await?))
}

async fn get_downline(
    State(registry): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DownlineReport>, ApiError> {
    Ok(Json(blocking(registry, move |r| r.downline(&code)).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(Arc::new(Registry::new(Arc::new(MemoryStore::new()))))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn register_req(email: &str, sponsor: Option<&str>, position: &str) -> Request<Body> {
        let body = json!({
            "name": "Test",
            "email": email,
            "mobile": "555-0100",
            "password": "secret",
            "sponsor_code": sponsor,
            "position": position,
        });
        Request::builder()
            .method("POST")
            .uri("/api/members/register")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = send(&app(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }

    #[tokio::test]
    async fn register_root_then_spill() {
        let app = app();

        let (status, body) = send(&app, register_req("r@example.com", None, "left")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["member_code"], "MEM00001");
        assert_eq!(body["placed_under"], "ROOT");
        assert!(body["position"].is_null());
        assert!(body["member"].get("credential").is_none());

        send(&app, register_req("a@example.com", Some("MEM00001"), "left")).await;
        let req = register_req("b@example.com", Some("MEM00001"), "left");
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["placed_under"], "MEM00002");
        assert_eq!(body["position"], "left");

        let (status, body) = send(&app, get("/api/members/MEM00001/downline")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_left"], 2);
        assert_eq!(body["total_right"], 0);
        assert_eq!(body["left_downline"].as_array().unwrap().len(), 2);
        assert_eq!(body["direct_left"]["member_code"], "MEM00002");
        assert!(body["direct_right"].is_null());
    }

    #[tokio::test]
    async fn invalid_position_is_bad_request() {
        let (status, body) = send(&app(), register_req("r@example.com", None, "middle")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("left"));
    }

    #[tokio::test]
    async fn unknown_sponsor_is_bad_request() {
        let app = app();
        send(&app, register_req("r@example.com", None, "left")).await;
        let (status, _) = send(&app, register_req("a@example.com", Some("MEM00099"), "left")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn verify_sponsor_found_and_missing() {
        let app = app();
        send(&app, register_req("r@example.com", None, "left")).await;
        send(&app, register_req("a@example.com", Some("MEM00001"), "right")).await;

        let (status, body) = send(&app, get("/api/members/verify-sponsor/MEM00001")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["sponsor"]["left_filled"], false);
        assert_eq!(body["sponsor"]["right_filled"], true);

        let (status, body) = send(&app, get("/api/members/verify-sponsor/MEM00404")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn member_lookup_and_listing() {
        let app = app();
        send(&app, register_req("r@example.com", None, "left")).await;

        let (status, body) = send(&app, get("/api/members/MEM00001")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "r@example.com");

        let (status, _) = send(&app, get("/api/members/MEM00002")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, get("/api/members")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    fn raw_register(content_type: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/members/register")
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_bodies_use_error_shape() {
        let app = app();
        let cases = [
            raw_register("application/json", "{not json"),
            raw_register("application/json", r#"{"email":"r@example.com","sponsor_code":5}"#),
            raw_register("text/plain", "name=r"),
        ];
        for req in cases {
            let (status, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().is_some(), "{body}");
        }
    }
}
