//! Web server for running PAA extractions from the browser.
//!
//! Provides:
//! - a one-action extract page rendering the flat result table
//! - CSV/JSON downloads of the table
//! - collapsible per-query detail sections
//! - a small JSON API (results, queries, status)

mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cache::ResultCache;
use crate::config::Settings;
use crate::pipeline::PaaProvider;
use crate::serpapi::SerpClient;
use crate::source::QuerySource;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<QuerySource>,
    pub provider: Arc<dyn PaaProvider>,
    pub cache: Arc<ResultCache>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let serp = SerpClient::new(settings.serp_config()?);

        Ok(Self {
            source: Arc::new(QuerySource::new(&settings.query_repo, &settings.query_file)),
            provider: Arc::new(serp),
            cache: Arc::new(ResultCache::new()),
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use mockito::Matcher;
    use tower::ServiceExt;

    use crate::serpapi::SerpConfig;

    const QUERY_FILE_BODY: &str = "site:example.com\n\nbest laptops 2024\n";

    const PAA_BODY: &str = r#"{"related_questions": [
        {"question": "Is example.com real?", "snippet": "It is reserved.", "link": "https://example.com/about"},
        {"question": "Who runs example.com?", "answer": "IANA"}
    ]}"#;

    async fn mock_github(server: &mut mockito::ServerGuard) {
        let base = server.url();
        server
            .mock("GET", "/repos/test/repo/contents/queries.txt")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                "{{\"download_url\": \"{}/raw/queries.txt\"}}",
                base
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/raw/queries.txt")
            .with_status(200)
            .with_body(QUERY_FILE_BODY)
            .create_async()
            .await;
    }

    fn test_state(github_url: &str, serp_url: &str) -> AppState {
        AppState {
            source: Arc::new(QuerySource::with_api_base(
                "test/repo",
                "queries.txt",
                github_url,
            )),
            provider: Arc::new(SerpClient::new(SerpConfig {
                api_key: "test-key".to_string(),
                hl: "fr".to_string(),
                gl: "fr".to_string(),
                num: 10,
                base_url: serp_url.to_string(),
            })),
            cache: Arc::new(ResultCache::new()),
        }
    }

    /// App backed by mocked GitHub and SerpApi: first query has two PAA
    /// entries, second has none.
    async fn setup_test_app() -> (axum::Router, mockito::ServerGuard, mockito::ServerGuard) {
        let mut github = mockito::Server::new_async().await;
        let mut serp = mockito::Server::new_async().await;

        mock_github(&mut github).await;

        serp.mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "site:example.com".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAA_BODY)
            .create_async()
            .await;
        serp.mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "best laptops 2024".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let app = create_router(test_state(&github.url(), &serp.url()));
        (app, github, serp)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_page() {
        let (app, _github, _serp) = setup_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("test/repo"));
    }

    #[tokio::test]
    async fn test_static_css() {
        let (app, _github, _serp) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/style.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap_or(""));
        assert!(content_type.unwrap_or("").contains("css"));
    }

    #[tokio::test]
    async fn test_extract_renders_full_table() {
        let (app, _github, _serp) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/extract")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("site:example.com"));
        assert!(html.contains("Is example.com real?"));
        assert!(html.contains("best laptops 2024"));
        // Placeholder row for the query with no PAA entries
        assert!(html.contains("<td>—</td>"));
        assert!(html.contains("3 lignes, 2 requêtes"));
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (app, _github, _serp) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/export.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert!(disposition.contains("paa_results.csv"));

        let csv = body_string(response).await;
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Requête,Question PAA,Réponse,Source");
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains("best laptops 2024,—,—,"));
    }

    #[tokio::test]
    async fn test_export_json() {
        let (app, _github, _serp) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/export.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let rows: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 3);
        assert_eq!(rows[0]["query"], "site:example.com");
        assert_eq!(rows[2]["question"], "—");
    }

    #[tokio::test]
    async fn test_api_queries() {
        let (app, _github, _serp) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/queries")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["site:example.com", "best laptops 2024"])
        );
    }

    #[tokio::test]
    async fn test_api_status() {
        let (app, _github, _serp) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["query_repo"], "test/repo");
        assert_eq!(json["cached_tables"], 0);
    }

    #[tokio::test]
    async fn test_warm_cache_issues_no_provider_calls() {
        let mut github = mockito::Server::new_async().await;
        let mut serp = mockito::Server::new_async().await;

        mock_github(&mut github).await;

        let first = serp
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "site:example.com".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAA_BODY)
            .expect(1)
            .create_async()
            .await;
        let second = serp
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "best laptops 2024".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let app = create_router(test_state(&github.url(), &serp.url()));

        for uri in ["/extract", "/export.csv", "/api/results"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // One provider call per query across all three requests
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_source_aborts_before_any_search() {
        let mut github = mockito::Server::new_async().await;
        let mut serp = mockito::Server::new_async().await;

        github
            .mock("GET", "/repos/test/repo/contents/queries.txt")
            .with_status(404)
            .with_body("{\"message\": \"Not Found\"}")
            .create_async()
            .await;
        let search = serp
            .mock("GET", "/search")
            .expect(0)
            .create_async()
            .await;

        let app = create_router(test_state(&github.url(), &serp.url()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/extract")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = body_string(response).await;
        assert!(html.contains("test/repo/queries.txt"));
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_failure_still_renders_placeholder() {
        let mut github = mockito::Server::new_async().await;
        let mut serp = mockito::Server::new_async().await;

        mock_github(&mut github).await;
        serp.mock("GET", "/search")
            .with_status(500)
            .create_async()
            .await;

        let app = create_router(test_state(&github.url(), &serp.url()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/extract")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Failed searches degrade to empty results per query
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("2 lignes, 2 requêtes"));
        assert!(html.contains("<td>—</td>"));
    }
}
