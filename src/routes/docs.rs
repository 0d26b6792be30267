//! Documentation endpoint
//!
//! Serves the OpenAPI document for the APIM proxy endpoints.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::docs::ApimProxyDoc;

/// Handler for OpenAPI JSON endpoint
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApimProxyDoc::openapi())
}

/// Create the docs router
///
/// - GET /apim/docs/openapi.json - Raw OpenAPI spec
///
/// Generic over state type S so it can be merged into any router.
pub fn create_docs_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/apim/docs/openapi.json", get(openapi_json))
}
