//! Saving uploaded files under sanitized, unique names.

use std::path::{Path, PathBuf};

/// Keeps ASCII letters, digits, `.`, `-` and `_`; other characters become `_`. Leading dots
/// are dropped so the result can never be `..` or a hidden file. Empty input yields
/// `"upload"`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Writes `bytes` to `dir/<uuid>-<sanitized name>` and returns the path.
pub async fn save_upload(dir: &Path, original: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!(
        "{}-{}",
        uuid::Uuid::new_v4().simple(),
        sanitize_file_name(original)
    ));
    tokio::fs::write(&path, bytes).await?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "upload saved");
    Ok(path)
}

/// Deletes saved uploads once their request is answered. Failures are logged, not returned.
pub async fn remove_uploads(paths: &[PathBuf]) {
    for path in paths {
        if let Err(error) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), %error, "failed to remove upload");
        }
    }
}
