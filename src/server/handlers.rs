//! Request handlers for the web interface.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

use super::templates;
use super::AppState;
use crate::export;
use crate::models::ResultTable;
use crate::pipeline::aggregate;
use crate::source::SourceError;

/// Landing page with the extract action.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(templates::base_template(
        "Extraction des PAA Google",
        &templates::index_page(state.source.repo(), state.source.path()),
    ))
}

/// Fetch the query list, then aggregate through the cache. A warm cache
/// means zero provider calls.
async fn run_pipeline(state: &AppState) -> Result<Arc<ResultTable>, SourceError> {
    let queries = state.source.fetch_queries().await?;
    let table = state
        .cache
        .get_or_compute(&queries, || {
            let provider = state.provider.clone();
            let queries = &queries;
            async move { aggregate(queries, provider.as_ref(), |_, _| {}).await }
        })
        .await;
    Ok(table)
}

fn source_error_page(e: &SourceError) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Html(templates::base_template(
            "Erreur",
            &templates::error_page(&e.to_string()),
        )),
    )
        .into_response()
}

fn source_error_json(e: &SourceError) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}

/// Run the pipeline and render the result table.
pub async fn extract(State(state): State<AppState>) -> Response {
    match run_pipeline(&state).await {
        Ok(table) => Html(templates::base_template(
            "Résultats PAA",
            &templates::results_page(&table),
        ))
        .into_response(),
        Err(e) => source_error_page(&e),
    }
}

/// Download the result table as CSV.
pub async fn export_csv(State(state): State<AppState>) -> Response {
    let table = match run_pipeline(&state).await {
        Ok(table) => table,
        Err(e) => return source_error_json(&e),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"paa_results.csv\"",
        )
        .body(Body::from(export::to_csv(&table)))
        .unwrap()
        .into_response()
}

/// Download the result table as JSON.
pub async fn export_json(State(state): State<AppState>) -> Response {
    let table = match run_pipeline(&state).await {
        Ok(table) => table,
        Err(e) => return source_error_json(&e),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"paa_results.json\"",
        )
        .body(Body::from(export::to_json(&table)))
        .unwrap()
        .into_response()
}

/// Result rows as JSON, for API consumers.
pub async fn api_results(State(state): State<AppState>) -> Response {
    match run_pipeline(&state).await {
        Ok(table) => Json(table.rows.clone()).into_response(),
        Err(e) => source_error_json(&e),
    }
}

/// The query list as currently served by the source repository.
pub async fn api_queries(State(state): State<AppState>) -> Response {
    match state.source.fetch_queries().await {
        Ok(queries) => Json(queries).into_response(),
        Err(e) => source_error_json(&e),
    }
}

/// Runtime status: configured source and cache occupancy.
pub async fn api_status(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({
        "query_repo": state.source.repo(),
        "query_file": state.source.path(),
        "cached_tables": state.cache.len(),
    }))
    .into_response()
}

/// Serve the bundled stylesheet.
pub async fn serve_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        templates::CSS,
    )
}
