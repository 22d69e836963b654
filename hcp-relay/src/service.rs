use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::Json,
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

type ProxyResponse = (StatusCode, Json<Value>);

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub upstream: String,
}

pub fn create_app(upstream: String) -> Router {
    // No timeout on the upstream client: the relay is a pass-through, the
    // upstream's own behavior decides how long a request lives.
    let state = AppState {
        http: reqwest::Client::new(),
        upstream,
    };
    build_router(state)
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/proxy/{*path}", get(relay_get).post(relay_post))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "HCP Engagement Relay",
        "version": "1.0.0",
        "description": "Forwards dashboard traffic to the analytics backend",
        "endpoints": {
            "GET /api/proxy/{path}": "Forward a GET request upstream",
            "POST /api/proxy/{path}": "Forward a POST request upstream",
            "GET /health": "Relay health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn relay_post(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: String,
) -> ProxyResponse {
    info!("Relaying POST {}", path);

    let mut request = state
        .http
        .post(upstream_url(&state.upstream, &path))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body);

    if let Some(auth) = authorization_header(&headers) {
        request = request.header(header::AUTHORIZATION, auth);
    }

    relay(request, &path).await
}

async fn relay_get(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> ProxyResponse {
    info!("Relaying GET {}", path);

    let mut request = state.http.get(upstream_url(&state.upstream, &path));

    if let Some(auth) = authorization_header(&headers) {
        request = request.header(header::AUTHORIZATION, auth);
    }

    relay(request, &path).await
}

fn upstream_url(upstream: &str, path: &str) -> String {
    format!("{}/{}", upstream.trim_end_matches('/'), path)
}

/// Only the authorization header crosses the relay; everything else the
/// client sent stays on this side.
fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

async fn relay(request: reqwest::RequestBuilder, path: &str) -> ProxyResponse {
    match forward(request).await {
        Ok((status, data)) => (status, Json(data)),
        Err(e) => {
            warn!("Proxy request for {} failed: {}", path, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Proxy request failed" })),
            )
        }
    }
}

/// Forward the request and hand back the upstream's status together with its
/// body parsed as JSON. Any transport failure or a body that is not JSON
/// bubbles up as an error and becomes the fixed 500 payload.
async fn forward(request: reqwest::RequestBuilder) -> anyhow::Result<(StatusCode, Value)> {
    let response = request.send().await?;
    let status = StatusCode::from_u16(response.status().as_u16())?;
    let data: Value = response.json().await?;
    Ok((status, data))
}
