//! OpenAPI specification for the APIM proxy
//!
//! Aggregates the proxy endpoints and their schemas into a single OpenAPI document.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::apim::{ApiInfo, ApiList, ApplicationInfo, ApplicationList, Pagination};
use crate::error::ErrorResponse;

/// OpenAPI specification for the APIM proxy
#[derive(OpenApi)]
#[openapi(
    info(
        title = "APIM REST API Proxy",
        version = "1.0.0",
        description = "Read-only proxy for the API Manager Publisher and Developer Portal listings"
    ),
    paths(
        crate::routes::apim::list_apis,
        crate::routes::apim::list_applications
    ),
    components(
        schemas(
            Pagination,
            ApiInfo,
            ApiList,
            ApplicationInfo,
            ApplicationList,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "APIM", description = "API Manager listing endpoints")
    )
)]
pub struct ApimProxyDoc;

/// Security scheme addon for the dashboard session cookies
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "dashboard_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("DASHBOARD_USER"))),
            );
        }
    }
}
