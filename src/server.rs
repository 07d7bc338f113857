//! Web server for the quakemap page.
//!
//! Every page load runs a fresh render pass against the feed, so a browser
//! refresh shows the current events. Built on Axum.

use std::sync::Arc;

use axum::{Router, extract::State, response::Html, routing::get};

use crate::client::FeedLoader;
use crate::leaflet::LeafletPage;
use crate::renderer::{RenderConfig, Renderer};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub title: String,
    pub render: RenderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            title: crate::DEFAULT_TITLE.to_string(),
            render: RenderConfig::default(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    loader: Arc<FeedLoader>,
    renderer: Arc<Renderer>,
    title: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(loader: FeedLoader, config: &ServerConfig) -> Self {
        Self {
            loader: Arc::new(loader),
            renderer: Arc::new(Renderer::new(config.render.clone())),
            title: Arc::from(config.title.as_str()),
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn run_server(config: ServerConfig, loader: FeedLoader) -> anyhow::Result<()> {
    let state = AppState::new(loader, &config);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("🌍 quakemap starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Main page handler - one render pass per request.
///
/// A failed fetch has already been logged by the renderer; the page is
/// still served with its base map and legend.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let mut page = LeafletPage::new();
    if let Ok(summary) = state.renderer.render(&state.loader, &mut page).await {
        tracing::debug!("served page with {} markers", summary.markers_drawn);
    }
    Html(page.into_html(&state.title))
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_page_server(feed_url: String) -> String {
        let loader = FeedLoader::new(feed_url).unwrap();
        let state = AppState::new(loader, &ServerConfig::default());
        spawn(create_router(state)).await
    }

    #[tokio::test]
    async fn test_index_renders_feed() {
        let feed = json!({
            "type": "FeatureCollection",
            "features": [{
                "geometry": { "coordinates": [-122.4, 37.8, 5.2] },
                "properties": { "mag": 3.1, "place": "Bay Area", "time": 1_700_000_000_000_i64 }
            }]
        })
        .to_string();
        let feed_base = spawn(Router::new().route(
            "/feed.geojson",
            get(move || {
                let feed = feed.clone();
                async move { feed }
            }),
        ))
        .await;
        let base = spawn_page_server(format!("{feed_base}/feed.geojson")).await;

        let html = reqwest::get(&base).await.unwrap().text().await.unwrap();
        assert!(html.contains("<title>USGS Earthquakes</title>"));
        assert_eq!(html.matches("L.circle(").count(), 1);
        assert!(html.contains("Bay Area"));
        assert!(html.contains("Depth (km)"));
    }

    #[tokio::test]
    async fn test_index_survives_feed_failure() {
        let feed_base = spawn(Router::new()).await;
        let base = spawn_page_server(format!("{feed_base}/feed.geojson")).await;

        let response = reqwest::get(&base).await.unwrap();
        assert!(response.status().is_success());
        let html = response.text().await.unwrap();
        assert_eq!(html.matches("L.circle(").count(), 0);
        assert!(html.contains("L.tileLayer("));
        assert!(html.contains("Depth (km)"));
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_page_server("http://127.0.0.1:9/unused".into()).await;
        let body = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "OK");
    }
}
