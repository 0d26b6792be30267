//! Access token extraction
//!
//! The dashboard stores the APIM access token split across two cookies:
//! the `SDID` field of the JSON `DASHBOARD_USER` cookie holds the first
//! half and the `HID` cookie holds the second.

use axum::http::{header, HeaderMap, HeaderValue};
use serde_json::Value;
use thiserror::Error;

const DASHBOARD_USER: &str = "DASHBOARD_USER=";
const TOKEN_PART_ONE_FIELD: &str = "SDID";
const TOKEN_PART_TWO: &str = "HID=";

/// Errors raised while reading the token from cookies
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("Missing Cookie header.")]
    MissingHeader,

    #[error("Cookie header is not valid UTF-8.")]
    NotUtf8,

    #[error("Malformed DASHBOARD_USER cookie: {0}")]
    MalformedDashboardUser(#[source] serde_json::Error),

    #[error("Malformed DASHBOARD_USER cookie: expected a JSON object")]
    DashboardUserNotObject,

    #[error("Malformed DASHBOARD_USER cookie: SDID must be a scalar value")]
    InvalidSdid,

    #[error("Access token from cookies contains characters not allowed in a header")]
    InvalidTokenCharacters,
}

/// Access token forwarded to APIM as a bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&"<redacted>").finish()
    }
}

/// Read the `Cookie` header and assemble the access token from it
pub fn access_token_from_headers(headers: &HeaderMap) -> Result<AccessToken, CookieError> {
    let raw = headers
        .get(header::COOKIE)
        .ok_or(CookieError::MissingHeader)?;
    // `to_str` only admits visible ASCII; the dashboard JSON may carry UTF-8.
    let cookies = std::str::from_utf8(raw.as_bytes()).map_err(|_| CookieError::NotUtf8)?;

    extract_access_token(cookies)
}

/// Assemble the access token from a raw cookie header.
///
/// Fragments are scanned in order and the last match for each half wins.
/// A missing half contributes an empty string.
pub fn extract_access_token(cookies: &str) -> Result<AccessToken, CookieError> {
    let mut first = None;
    let mut second = None;

    for cookie in cookies.split(';') {
        if cookie.contains(DASHBOARD_USER) {
            if let Some(sdid) = sdid(&cookie.replace(DASHBOARD_USER, ""))? {
                first = Some(sdid);
            }
        } else if cookie.contains(TOKEN_PART_TWO) {
            second = Some(cookie.replace(TOKEN_PART_TWO, "").trim().to_string());
        }
    }

    let token = format!("{}{}", first.unwrap_or_default(), second.unwrap_or_default());

    // The token travels as `Authorization: Bearer {token}`.
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| CookieError::InvalidTokenCharacters)?;

    Ok(AccessToken(token))
}

/// `SDID` field of the dashboard user JSON; `None` when absent or null
fn sdid(user: &str) -> Result<Option<String>, CookieError> {
    let value: Value = serde_json::from_str(user).map_err(CookieError::MalformedDashboardUser)?;
    let object = value.as_object().ok_or(CookieError::DashboardUserNotObject)?;

    match object.get(TOKEN_PART_ONE_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(CookieError::InvalidSdid),
    }
}
