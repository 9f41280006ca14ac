//! Shared plumbing for the HTTP collaborators (feature `remote`).

use std::time::Duration;

/// Default request timeout for collaborator calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client with the collaborator timeout applied.
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Passes successful responses through; otherwise returns `"<api> error (<status>): <body>"`.
pub async fn ensure_success(
    response: reqwest::Response,
    api: &str,
) -> Result<reqwest::Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(format!("{} error ({}): {}", api, status, body))
}

/// Joins a base URL and a path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: join_url tolerates slashes on either side.
    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("https://a/v1/", "/x"), "https://a/v1/x");
        assert_eq!(join_url("https://a/v1", "x"), "https://a/v1/x");
    }
}
