//! HTTP transport for Gerrit REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, Request, StatusCode};
use std::fmt;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Gerrit prefixes every JSON response with this line to defeat XSSI
pub const XSSI_PREFIX: &str = ")]}'";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Remove the XSSI guard line, if present, from a response body
pub fn strip_xssi_prefix(body: &str) -> &str {
    match body.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.trim_start_matches(['\r', '\n']),
        None => body,
    }
}

/// A non-success response from the server
///
/// Carried inside [`anyhow::Error`]; use `downcast_ref::<ApiError>()` to
/// inspect the status.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API request failed: {}", self.status)
    }
}

impl std::error::Error for ApiError {}

/// HTTP client wrapper for Gerrit API calls
#[derive(Clone, Debug)]
pub struct GerritHttpClient {
    client: Client,
}

impl GerritHttpClient {
    /// Create a new HTTP client
    pub fn new(accept_invalid_certs: bool, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("gerrit-projects/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(accept_invalid_certs);

        if accept_invalid_certs {
            tracing::warn!("Accepting invalid certificates, connection is NOT trustworthy");
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Start building a request with the underlying [`reqwest`] client
    pub fn request(&self, method: reqwest::Method, url: url::Url) -> reqwest::RequestBuilder {
        self.client.request(method, url)
    }

    /// Execute a request and return its body with the XSSI guard removed
    pub async fn execute(&self, request: Request) -> Result<String> {
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!("{} {}", method, url);

        let response = self
            .client
            .execute(request)
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("{} {} failed: {} - {}", method, url, status, sanitize_for_log(&body));
            return Err(ApiError { status, body }.into());
        }

        Ok(strip_xssi_prefix(&body).to_string())
    }
}

/// Format a Gerrit API error for display
pub fn format_gerrit_error(error: &anyhow::Error) -> String {
    if let Some(api_error) = error.downcast_ref::<ApiError>() {
        return match api_error.status {
            StatusCode::UNAUTHORIZED => {
                "Authentication failed. Check GERRIT_USERNAME and GERRIT_HTTP_PASSWORD.".to_string()
            }
            StatusCode::FORBIDDEN => "Permission denied.".to_string(),
            StatusCode::NOT_FOUND => "Resource not found.".to_string(),
            StatusCode::CONFLICT => {
                "Resource conflict. The resource may already exist.".to_string()
            }
            StatusCode::PRECONDITION_FAILED => "Precondition failed.".to_string(),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                // Gerrit explains rejected input in a short plain-text body
                let reason = sanitize_for_log(api_error.body.trim());
                if reason.is_empty() {
                    "Invalid request. Check your parameters.".to_string()
                } else {
                    format!("Invalid request: {}", reason)
                }
            }
            status if status.is_server_error() => {
                "Gerrit server error. Please try again.".to_string()
            }
            status => format!("Request failed: {}", status),
        };
    }

    let error_str = format!("{:#}", error);
    let sanitized = error_str
        .chars()
        .filter(|c| !c.is_control())
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
