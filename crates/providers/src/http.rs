//! Shared HTTP plumbing: client construction and status-code mapping.

use skyline_core::error::ProviderError;
use std::time::Duration;
use tracing::warn;

/// Seconds to suggest when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn build_client(timeout_secs: u64) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, timeout_secs, "HTTP client setup failed, falling back to defaults without a request timeout");
            reqwest::Client::new()
        }
    }
}

/// Map a transport failure (connect, TLS, timeout) to a provider error.
pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Pass a 200 response through; turn anything else into a provider error.
pub(crate) async fn check_status(
    provider: &str,
    model: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status == 200 {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    warn!(provider, status, body = %body, "Provider returned error");

    Err(status_error(status, model, retry_after, body))
}

pub(crate) fn status_error(
    status: u16,
    model: &str,
    retry_after: Option<u64>,
    body: String,
) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        401 | 403 => ProviderError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError {
            status_code: status,
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_client_is_usable() {
        let client = build_client(1);
        let request = client
            .post("http://127.0.0.1:9/models/m:generateContent")
            .build()
            .unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().port(), Some(9));
    }

    #[test]
    fn rate_limit_uses_retry_after() {
        let err = status_error(429, "m", Some(30), String::new());
        assert!(matches!(err, ProviderError::RateLimited { retry_after_secs: 30 }));

        let err = status_error(429, "m", None, String::new());
        assert!(matches!(err, ProviderError::RateLimited { retry_after_secs: 5 }));
    }

    #[test]
    fn auth_and_model_errors() {
        assert!(matches!(
            status_error(403, "m", None, String::new()),
            ProviderError::AuthenticationFailed(_)
        ));
        match status_error(404, "gemini-9", None, String::new()) {
            ProviderError::ModelNotFound(model) => assert_eq!(model, "gemini-9"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn other_statuses_keep_body() {
        match status_error(500, "m", None, "upstream exploded".into()) {
            ProviderError::ApiError { status_code, message } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
