//! Background-removal transform service.
//!
//! The service accepts image bytes over HTTP multipart and returns processed
//! bytes, or a JSON error payload whose first `errors[].title` is the
//! human-readable reason. That title is surfaced to the user verbatim when
//! present; anything else falls back to a generic message.
//!
//! The client is blocking — callers in the command layer run it inside
//! `tokio::task::spawn_blocking` so the async runtime is not starved. No
//! timeout is imposed here beyond the HTTP library's defaults, and in-flight
//! calls cannot be cancelled.

use serde::Deserialize;

use crate::error::AppError;

/// Image-bytes-in, image-bytes-out background removal.
pub trait BackgroundRemover: Send + Sync {
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, AppError>;
}

/// HTTP client for a remove.bg-style endpoint.
pub struct RemoveBgClient {
    endpoint: String,
    api_key: String,
    http: reqwest::blocking::Client,
}

impl RemoveBgClient {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.remove.bg/v1.0/removebg";

    /// Environment variable holding the service API key.
    pub const API_KEY_VAR: &'static str = "MOODBOARD_REMOVEBG_KEY";

    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Client against the default endpoint, keyed from the environment. An
    /// absent key is not fatal at startup — the service itself will reject
    /// unauthenticated calls and that rejection is surfaced like any other
    /// service error.
    pub fn from_env() -> Self {
        let api_key = std::env::var(Self::API_KEY_VAR).unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!(
                "{} is not set; background removal will fail until it is",
                Self::API_KEY_VAR
            );
        }
        Self::new(Self::DEFAULT_ENDPOINT, api_key)
    }
}

impl BackgroundRemover for RemoveBgClient {
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, AppError> {
        let part = reqwest::blocking::multipart::Part::bytes(image.to_vec())
            .file_name("image.png");
        let form = reqwest::blocking::multipart::Form::new().part("image_file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .multipart(form)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().map(|b| b.to_vec()).unwrap_or_default();
            let message = service_error_message(&body)
                .unwrap_or_else(|| format!("background removal failed with status {status}"));
            return Err(AppError::Service(message));
        }

        Ok(response.bytes()?.to_vec())
    }
}

/// Error payload shape reported by the service:
/// `{ "errors": [ { "title": "...", ... } ] }`.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    title: String,
}

/// Extract the service's own error message from a failure body, if it
/// reported one.
fn service_error_message(body: &[u8]) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_slice(body).ok()?;
    payload
        .errors
        .into_iter()
        .map(|e| e.title)
        .find(|t| !t.is_empty())
}

/// Fetch the bytes behind an image URL. Layers reference either remote stock
/// images (`http`/`https`) or locally stored processed images (`file://`).
pub fn fetch_image_bytes(url: &str) -> Result<Vec<u8>, AppError> {
    if let Some(path) = url.strip_prefix("file://") {
        return std::fs::read(path)
            .map_err(|e| AppError::Io(format!("failed to read image file: {e}")));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        let response = reqwest::blocking::get(url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Io(format!("failed to fetch image: {status}")));
        }
        return Ok(response.bytes()?.to_vec());
    }
    Err(AppError::Io(format!(
        "unsupported image URL scheme: {url}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_message_extracts_first_title() {
        let body = br#"{ "errors": [ { "title": "Could not identify foreground", "code": "x" } ] }"#;
        assert_eq!(
            service_error_message(body),
            Some("Could not identify foreground".to_string())
        );
    }

    #[test]
    fn service_error_message_skips_empty_titles() {
        let body = br#"{ "errors": [ { "title": "" }, { "title": "Rate limit exceeded" } ] }"#;
        assert_eq!(
            service_error_message(body),
            Some("Rate limit exceeded".to_string())
        );
    }

    #[test]
    fn service_error_message_is_none_for_unparseable_bodies() {
        assert_eq!(service_error_message(b"<html>502</html>"), None);
        assert_eq!(service_error_message(br#"{ "errors": [] }"#), None);
    }

    #[test]
    fn fetch_image_bytes_reads_file_urls() {
        let path = std::env::temp_dir().join(format!(
            "moodboard_fetch_test_{}.png",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, b"image-bytes").expect("write fixture");
        let url = format!("file://{}", path.display());

        let bytes = fetch_image_bytes(&url).expect("fetch");
        let _ = std::fs::remove_file(&path);

        assert_eq!(bytes, b"image-bytes");
    }

    #[test]
    fn fetch_image_bytes_rejects_unknown_schemes() {
        let result = fetch_image_bytes("ftp://example/image.png");
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn fetch_image_bytes_fails_for_missing_files() {
        let result = fetch_image_bytes("file:///nonexistent/moodboard/image.png");
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
