//! Web server for the earthquake map.
//!
//! Every page load is one render pass: fetch the feed, style the events,
//! compose the view and send it to the browser. Nothing is cached between
//! requests.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tracing::{error, info};

use crate::client::{FeedType, UsgsClient};
use crate::errors::QuakemapError;
use crate::page::render_page;
use crate::view::{MapComposer, Scene, ViewHandle};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub feed_type: FeedType,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            feed_type: FeedType::default(),
        }
    }
}

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    client: UsgsClient,
    composer: Arc<MapComposer>,
    feed_type: FeedType,
}

impl AppState {
    #[must_use]
    pub fn new(client: UsgsClient, composer: MapComposer, feed_type: FeedType) -> Self {
        Self {
            client,
            composer: Arc::new(composer),
            feed_type,
        }
    }

    /// Load the feed and compose a fresh view.
    async fn render_pass(&self) -> Result<ViewHandle, QuakemapError> {
        let loaded = self.client.load_events(self.feed_type).await;
        self.composer.compose(loaded, &Local)
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/view.json", get(view_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(config: ServerConfig, composer: MapComposer) -> anyhow::Result<()> {
    let client = UsgsClient::new()?;
    let state = AppState::new(client, composer, config.feed_type);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("🌍 quakemap starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Failure that aborted a render pass.
struct RenderError(QuakemapError);

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!("render failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to render the earthquake map",
        )
            .into_response()
    }
}

impl From<QuakemapError> for RenderError {
    fn from(e: QuakemapError) -> Self {
        Self(e)
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Main page handler - serves the map.
async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, RenderError> {
    let view = state.render_pass().await?;
    Ok(Html(render_page(&view)?))
}

/// Scene description of a fresh view.
async fn view_handler(
    State(state): State<AppState>,
) -> Result<Json<Scene>, RenderError> {
    let view = state.render_pass().await?;
    Ok(Json(view.scene()))
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AccessToken;

    const FEED_PATH: &str = "/earthquakes/feed/v1.0/summary/all_week.geojson";

    const FEED: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","id":"deep","properties":{"mag":4.0,"place":"Deep one","time":1700000000000},
         "geometry":{"type":"Point","coordinates":[-117.6,35.6,95.0]}},
        {"type":"Feature","id":"shallow","properties":{"mag":2.0,"place":"Shallow one","time":1700000000000},
         "geometry":{"type":"Point","coordinates":[-118.1,34.0,10.0]}}
    ]}"#;

    async fn spawn_feed(body: &'static str) -> String {
        let router = Router::new().route(FEED_PATH, get(move || async move { body }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn app(base_url: &str) -> Router {
        let client = UsgsClient::with_base_url(base_url).unwrap();
        let composer = MapComposer::new(AccessToken::new("pk.test").unwrap());
        create_router(AppState::new(client, composer, FeedType::AllWeek))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_body(app("http://127.0.0.1:9"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_view_json_styles_feed() {
        let base = spawn_feed(FEED).await;
        let (status, body) = get_body(app(&base), "/view.json").await;
        assert_eq!(status, StatusCode::OK);

        let scene: serde_json::Value = serde_json::from_str(&body).unwrap();
        let markers = scene["layers"][3]["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0]["style"]["radius"], 20.0);
        assert_eq!(markers[0]["style"]["fillColor"], "#ff0000");
        assert_eq!(markers[1]["style"]["radius"], 10.0);
        assert_eq!(markers[1]["style"]["fillColor"], "#20B2AA");
        assert!(scene.get("notice").is_none());
    }

    #[tokio::test]
    async fn test_index_renders_page() {
        let base = spawn_feed(FEED).await;
        let (status, body) = get_body(app(&base), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<div id="mapid" class="map"></div>"#));
        assert!(body.contains("Deep one"));
    }

    #[tokio::test]
    async fn test_empty_feed_renders_empty_overlay() {
        let base = spawn_feed(r#"{"type":"FeatureCollection","features":[]}"#).await;
        let (status, body) = get_body(app(&base), "/view.json").await;

        assert_eq!(status, StatusCode::OK);
        let scene: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(scene["layers"][3]["markers"].as_array().unwrap().is_empty());
        assert_eq!(scene["layers"][0]["visible"], true);
    }

    #[tokio::test]
    async fn test_unreachable_feed_still_renders_map() {
        let (status, body) = get_body(app("http://127.0.0.1:9"), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"class="notice""#));
        assert!(body.contains("mapbox/satellite-v9"));
    }
}
