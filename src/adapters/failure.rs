//! Mapping of provider error replies onto `RelayError`.
//!
//! OpenAI, Anthropic and Gemini all wrap their errors in an `error` object but
//! name the interesting field differently (`code`, `type`, `status`,
//! `details[].reason`). Every candidate string is collected and checked
//! against the known codes before falling back to the HTTP status.

use crate::utils::error::RelayError;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

const AUTH_CODES: &[&str] = &[
    "invalid_api_key",
    "authentication_error",
    "permission_error",
    "API_KEY_INVALID",
    "PERMISSION_DENIED",
    "UNAUTHENTICATED",
];
const QUOTA_CODES: &[&str] = &["insufficient_quota", "billing_hard_limit_reached"];
const RATE_LIMIT_CODES: &[&str] = &["rate_limit_exceeded", "rate_limit_error"];
const EXHAUSTED_CODE: &str = "RESOURCE_EXHAUSTED";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorReason>,
}

#[derive(Debug, Deserialize)]
struct ErrorReason {
    #[serde(default)]
    reason: Option<String>,
}

/// Consumes a non-success response and classifies it.
pub(crate) async fn from_response(provider: &str, response: Response) -> RelayError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    from_body(provider, status, &body)
}

pub(crate) fn from_body(provider: &str, status: u16, body: &str) -> RelayError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();

    let mut codes: Vec<&str> = Vec::new();
    if let Some(code) = detail.code.as_ref().and_then(|c| c.as_str()) {
        codes.push(code);
    }
    if let Some(kind) = detail.kind.as_deref() {
        codes.push(kind);
    }
    if let Some(status) = detail.status.as_deref() {
        codes.push(status);
    }
    codes.extend(detail.details.iter().filter_map(|d| d.reason.as_deref()));

    let message = detail
        .message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

    tracing::debug!(provider, status, ?codes, "Classifying provider failure");
    classify(provider, status, &codes, message)
}

pub(crate) fn classify(provider: &str, status: u16, codes: &[&str], message: String) -> RelayError {
    let provider = provider.to_string();
    let has = |known: &[&str]| codes.iter().any(|c| known.contains(c));

    if has(AUTH_CODES) {
        return RelayError::ProviderAuthError { provider };
    }
    if has(QUOTA_CODES) {
        return RelayError::ProviderQuotaError { provider };
    }
    if has(RATE_LIMIT_CODES) {
        return RelayError::ProviderRateLimitError { provider };
    }
    if codes.contains(&EXHAUSTED_CODE) {
        return exhausted(provider, &message);
    }

    match status {
        401 | 403 => RelayError::ProviderAuthError { provider },
        402 => RelayError::ProviderQuotaError { provider },
        429 => exhausted(provider, &message),
        _ => RelayError::ProviderError {
            provider,
            status: Some(status),
            message: format!("{} {}", status, message),
        },
    }
}

fn exhausted(provider: String, message: &str) -> RelayError {
    if message.to_ascii_lowercase().contains("quota") {
        RelayError::ProviderQuotaError { provider }
    } else {
        RelayError::ProviderRateLimitError { provider }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_error_codes() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert!(matches!(
            from_body("OpenAI", 401, body),
            RelayError::ProviderAuthError { .. }
        ));

        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        assert!(matches!(
            from_body("OpenAI", 429, body),
            RelayError::ProviderQuotaError { .. }
        ));

        let body = r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#;
        assert!(matches!(
            from_body("OpenAI", 429, body),
            RelayError::ProviderRateLimitError { .. }
        ));
    }

    #[test]
    fn test_anthropic_error_types() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        assert!(matches!(
            from_body("Anthropic", 401, body),
            RelayError::ProviderAuthError { .. }
        ));

        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;
        assert!(matches!(
            from_body("Anthropic", 429, body),
            RelayError::ProviderRateLimitError { .. }
        ));
    }

    #[test]
    fn test_gemini_error_reasons() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID"}]}}"#;
        assert!(matches!(
            from_body("Gemini", 400, body),
            RelayError::ProviderAuthError { .. }
        ));

        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            from_body("Gemini", 429, body),
            RelayError::ProviderQuotaError { .. }
        ));
    }

    #[test]
    fn test_status_fallback() {
        assert!(matches!(
            from_body("Groq", 401, ""),
            RelayError::ProviderAuthError { .. }
        ));
        assert!(matches!(
            from_body("Groq", 429, "too many requests"),
            RelayError::ProviderRateLimitError { .. }
        ));
    }

    #[test]
    fn test_unknown_failure_keeps_provider_message() {
        let body = r#"{"error":{"message":"The model `gpt-9` does not exist","type":"invalid_request_error","code":"model_not_found"}}"#;
        let err = from_body("OpenAI", 404, body);
        match &err {
            RelayError::ProviderError {
                status, message, ..
            } => {
                assert_eq!(*status, Some(404));
                assert!(message.contains("gpt-9"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Failed to generate excuse: 404 The model `gpt-9` does not exist"
        );
    }

    #[test]
    fn test_non_json_body_is_used_verbatim() {
        let err = from_body("DeepSeek", 502, "upstream connect error");
        assert_eq!(
            err.to_string(),
            "Failed to generate excuse: 502 upstream connect error"
        );

        let err = from_body("DeepSeek", 503, "");
        assert_eq!(
            err.to_string(),
            "Failed to generate excuse: 503 Service Unavailable"
        );
    }
}
