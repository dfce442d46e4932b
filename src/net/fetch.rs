use std::time::Duration;

use url::Url;

use crate::error::{ImportError, Result};

/// Result of fetching a URL
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub body: String,
    /// URL after redirects.
    pub url: String,
    pub status: u16,
    pub content_type: String,
}

/// Request settings for remote imports.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub bearer_token: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: concat!("sitemapper/", env!("CARGO_PKG_VERSION")).to_string(),
            bearer_token: None,
        }
    }
}

impl FetchOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Add `https://` when the scheme is missing and check the result parses.
pub fn normalize_url(url_str: &str) -> Result<Url> {
    let trimmed = url_str.trim();
    let url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    Url::parse(&url).map_err(|e| ImportError::Fetch {
        url: url_str.to_string(),
        message: format!("Invalid URL: {}", e),
    })
}

/// Fetch a URL and return its body as text (blocking).
///
/// Any non-2xx status is an error.
pub fn fetch_text(url_str: &str, options: &FetchOptions) -> Result<FetchResult> {
    let parsed = normalize_url(url_str)?;
    let fail = |message: String| ImportError::Fetch {
        url: parsed.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| fail(format!("Client error: {}", e)))?;

    let mut request = client.get(parsed.as_str()).header(
        "Accept",
        "application/vnd.google-earth.kml+xml,application/json,text/csv,text/plain;q=0.9,*/*;q=0.8",
    );
    if let Some(token) = &options.bearer_token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .map_err(|e| fail(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fail(format!("HTTP {}", status)));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/plain")
        .to_string();
    let final_url = response.url().to_string();

    let body = response
        .text()
        .map_err(|e| fail(format!("Failed to read body: {}", e)))?;

    log::debug!("fetched {} ({} bytes, {})", final_url, body.len(), content_type);
    Ok(FetchResult {
        body,
        url: final_url,
        status: status.as_u16(),
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_defaults_to_https() {
        assert_eq!(
            normalize_url("example.com/sites.csv").unwrap().as_str(),
            "https://example.com/sites.csv"
        );
        assert_eq!(normalize_url("http://x.org/a").unwrap().scheme(), "http");
    }

    #[test]
    fn invalid_url_is_a_fetch_error() {
        let err = normalize_url("http://[::1").unwrap_err();
        assert!(matches!(err, ImportError::Fetch { .. }));
    }

    #[test]
    fn default_options() {
        let o = FetchOptions::default().with_bearer_token("t");
        assert_eq!(o.timeout, Duration::from_secs(15));
        assert!(o.user_agent.starts_with("sitemapper/"));
        assert_eq!(o.bearer_token.as_deref(), Some("t"));
    }
}
