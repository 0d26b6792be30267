//! APIM listing endpoints
//!
//! - `GET /apim/apis` - APIs from the Publisher
//! - `GET /apim/applications` - applications from the Developer Portal
//!
//! The access token is assembled from the dashboard cookies and forwarded
//! to APIM; the upstream listing is returned unchanged on success.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, Span};
use uuid::Uuid;

use crate::{
    apim::{endpoint, ApiList, ApplicationList, Resource},
    auth::access_token_from_headers,
    error::{AppError, AppResult, ErrorResponse},
    routes::metrics::record_upstream_request,
    AppState,
};

/// List APIs from the APIM Publisher
#[utoipa::path(
    get,
    path = "/apim/apis",
    tag = "APIM",
    params(("Cookie" = String, Header, description = "Dashboard cookies carrying DASHBOARD_USER and HID")),
    responses(
        (status = 200, description = "API list from the Publisher", body = ApiList),
        (status = 400, description = "Publisher URL not configured or malformed cookie", body = ErrorResponse),
        (status = 500, description = "Configuration or upstream failure", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(trace_id = %short_trace_id(), operation = "list_apis", upstream_status = tracing::field::Empty))]
pub async fn list_apis(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<ApiList>)> {
    let apis: ApiList = proxy_listing(&state, &headers, Resource::Apis).await?;

    info!(count = ?apis.count, "Retrieved API list");
    Ok((StatusCode::OK, Json(apis)))
}

/// List applications from the APIM Developer Portal
#[utoipa::path(
    get,
    path = "/apim/applications",
    tag = "APIM",
    params(("Cookie" = String, Header, description = "Dashboard cookies carrying DASHBOARD_USER and HID")),
    responses(
        (status = 200, description = "Application list from the Developer Portal", body = ApplicationList),
        (status = 400, description = "No server URL configured or malformed cookie", body = ErrorResponse),
        (status = 500, description = "Configuration or upstream failure", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(trace_id = %short_trace_id(), operation = "list_applications", upstream_status = tracing::field::Empty))]
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<ApplicationList>)> {
    let applications: ApplicationList =
        proxy_listing(&state, &headers, Resource::Applications).await?;

    info!(count = ?applications.count, "Retrieved application list");
    Ok((StatusCode::OK, Json(applications)))
}

/// Resolve the server, build the token, call APIM and decode a 200 body.
///
/// No upstream call is made when the server URL is missing or the cookie
/// cannot be read.
async fn proxy_listing<T: DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    resource: Resource,
) -> AppResult<T> {
    let role = resource.role();

    let server_url = state
        .auth_config
        .server_url(role)
        .await
        .map_err(|source| AppError::Configuration { role, source })?
        .ok_or(AppError::MissingServerUrl(role))?;

    let endpoint = endpoint(&server_url, role);
    let token = access_token_from_headers(headers)?;
    debug!(endpoint = %endpoint, token_len = token.len(), "Forwarding to APIM");

    let started = Instant::now();
    let result = match resource {
        Resource::Apis => state.apim_client.get_apis(&endpoint, token.as_str()).await,
        Resource::Applications => {
            state
                .apim_client
                .get_applications(&endpoint, token.as_str())
                .await
        }
    };
    let elapsed = started.elapsed().as_secs_f64();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            record_upstream_request(resource.operation(), "error", elapsed);
            return Err(e);
        }
    };

    Span::current().record("upstream_status", response.status.as_u16());

    if response.status != StatusCode::OK {
        record_upstream_request(resource.operation(), "rejected", elapsed);
        return Err(AppError::UpstreamStatus {
            resource,
            status: response.status,
        });
    }

    match response.json() {
        Ok(listing) => {
            record_upstream_request(resource.operation(), "success", elapsed);
            Ok(listing)
        }
        Err(e) => {
            record_upstream_request(resource.operation(), "invalid_body", elapsed);
            Err(AppError::Json(e))
        }
    }
}

/// Short correlation id for log lines
fn short_trace_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}
