//! API Documentation module
//!
//! Provides OpenAPI specification generation for the proxy endpoints using utoipa.

mod openapi;

pub use openapi::ApimProxyDoc;
