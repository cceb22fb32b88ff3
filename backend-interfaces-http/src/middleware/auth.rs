use axum::http::HeaderMap;

use backend_domain::{RuntimeConfig, StudentId};

use crate::error::HttpError;

pub const STUDENT_ID_HEADER: &str = "X-Student-Id";

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Identity of the student making the call, as asserted by the gateway.
pub fn caller_id(headers: &HeaderMap) -> Option<StudentId> {
    headers
        .get(STUDENT_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Bearer check plus caller identity; both are required on `/me` routes.
pub fn authorize_caller(config: &RuntimeConfig, headers: &HeaderMap) -> Result<StudentId, HttpError> {
    if !authorize(config, headers) {
        return Err(HttpError::Unauthorized);
    }
    caller_id(headers).ok_or(HttpError::Unauthorized)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn config_with_token(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            api_token: token.map(str::to_string),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn bearer_token_must_match_when_configured() {
        let mut headers = HeaderMap::new();
        assert!(authorize(&config_with_token(None), &headers));
        assert!(!authorize(&config_with_token(Some("s3cret")), &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer s3cret"));
        assert!(authorize(&config_with_token(Some("s3cret")), &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer nope"));
        assert!(!authorize(&config_with_token(Some("s3cret")), &headers));
    }

    #[test]
    fn caller_id_requires_numeric_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(caller_id(&headers), None);
        headers.insert(STUDENT_ID_HEADER, HeaderValue::from_static(" 42 "));
        assert_eq!(caller_id(&headers), Some(StudentId(42)));
        headers.insert(STUDENT_ID_HEADER, HeaderValue::from_static("ana"));
        assert_eq!(caller_id(&headers), None);
        assert!(matches!(
            authorize_caller(&config_with_token(None), &headers),
            Err(HttpError::Unauthorized)
        ));
    }
}
