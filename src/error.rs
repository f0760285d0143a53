//! Application-level error type returned by all Tauri command handlers.
//!
//! `AppError` is serialized to `{ kind, message }` JSON payloads so the
//! TypeScript frontend can pattern-match on a stable `kind` string and show
//! the message in a dismissible snackbar.

/// Top-level error returned by Tauri command handlers.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": "<human-readable text>" }`
///
/// The TypeScript counterpart is:
/// ```ts
/// type AppError = { kind: string; message: string };
/// ```
///
/// Every variant is locally recoverable from the user's point of view except
/// [`AppError::NotFound`] on session open, which is terminal for that session
/// (there is nothing to edit).
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// No signed-in user; save, post and delete all require one.
    #[error("you need to be signed in to do this")]
    NotAuthenticated,

    /// A required name field was empty on save or post.
    #[error("{0}")]
    NameRequired(String),

    /// A requested resource (board, draft, collage, layer index) was not found.
    #[error("{0}")]
    NotFound(String),

    /// A generic I/O or network-transport error; retry by repeating the
    /// action. Inner errors are converted to strings at the system boundary
    /// so the enum remains serializable.
    #[error("{0}")]
    Io(String),

    /// A stored document could not be read or parsed.
    #[error("{0}")]
    StoreLoad(String),

    /// A document could not be written to the store.
    #[error("{0}")]
    StoreSave(String),

    /// The background-removal service returned a failure. The message is the
    /// service's own error text when it reported one.
    #[error("{0}")]
    Service(String),
}

impl From<std::io::Error> for AppError {
    /// Convert an [`std::io::Error`] into an [`AppError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    /// Transport-level HTTP failures (connection refused, DNS, timeouts) are
    /// transient I/O. Non-success responses are mapped to
    /// [`AppError::Service`] where the response body is available.
    fn from(e: reqwest::Error) -> Self {
        Self::Io(format!("network error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_authenticated_serializes_with_kind() {
        let err = AppError::NotAuthenticated;
        let value = serde_json::to_value(&err).expect("serialize AppError::NotAuthenticated");
        assert_eq!(value["kind"], "NotAuthenticated");
    }

    #[test]
    fn name_required_serializes_to_kind_message() {
        let err = AppError::NameRequired("Please enter a name for the draft.".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::NameRequired");
        assert_eq!(value["kind"], "NameRequired");
        assert_eq!(value["message"], "Please enter a name for the draft.");
    }

    #[test]
    fn not_found_serializes_to_kind_message() {
        let err = AppError::NotFound("Draft not found.".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::NotFound");
        assert_eq!(value["kind"], "NotFound");
        assert_eq!(value["message"], "Draft not found.");
    }

    #[test]
    fn io_error_serializes_to_kind_message() {
        let err = AppError::Io("disk full".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::Io");
        assert_eq!(value["kind"], "Io");
        assert_eq!(value["message"], "disk full");
    }

    #[test]
    fn service_error_serializes_to_kind_message() {
        let err = AppError::Service("Could not identify foreground".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::Service");
        assert_eq!(value["kind"], "Service");
        assert_eq!(value["message"], "Could not identify foreground");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err = AppError::from(io_err);
        assert!(matches!(app_err, AppError::Io(_)));
        let value = serde_json::to_value(&app_err).expect("serialize");
        assert_eq!(value["kind"], "Io");
    }

    #[test]
    fn app_error_display_is_human_readable() {
        assert_eq!(
            AppError::NotAuthenticated.to_string(),
            "you need to be signed in to do this"
        );
        assert_eq!(
            AppError::StoreSave("write failed".to_string()).to_string(),
            "write failed"
        );
        assert_eq!(
            AppError::NotFound("Board not found.".to_string()).to_string(),
            "Board not found."
        );
    }
}
