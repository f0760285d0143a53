//! Application state managed by Tauri.
//!
//! [`AppState`] is registered with `tauri::Builder::manage` and accessed from
//! command handlers via `tauri::State<AppState>`.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::editor::EditorSession;
use crate::services::BackgroundRemover;
use crate::store::{DocumentStore, ObjectStore};

/// The signed-in user, as reported by the shell's authentication layer.
///
/// Persistence code never reads this from a global — command handlers take it
/// out of [`AppState`] once and pass it down explicitly, so the codec and
/// store layers stay testable without any ambient auth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Stable user id; owner key for boards and drafts.
    pub uid: String,
    /// Display name stamped onto published collages.
    pub username: String,
}

/// Root application state managed by Tauri.
///
/// The session and identity are wrapped in [`RwLock`] so read-only commands
/// (snapshot queries) do not block each other. The collaborators are trait
/// objects so tests can run against a temp-dir store and a stub
/// background-removal service.
pub struct AppState {
    /// The active editing session.
    pub session: RwLock<EditorSession>,
    /// The signed-in user, if any. Save, post and delete require one.
    pub identity: RwLock<Option<UserIdentity>>,
    /// Document persistence.
    pub store: Arc<dyn DocumentStore>,
    /// Blob persistence for processed images.
    pub objects: Arc<dyn ObjectStore>,
    /// Background-removal transform service.
    pub remover: Arc<dyn BackgroundRemover>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        remover: Arc<dyn BackgroundRemover>,
    ) -> Self {
        Self {
            session: RwLock::new(EditorSession::default()),
            identity: RwLock::new(None),
            store,
            objects,
            remover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::store::{FsDocumentStore, FsObjectStore};

    struct NoopRemover;

    impl BackgroundRemover for NoopRemover {
        fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, AppError> {
            Ok(image.to_vec())
        }
    }

    fn make_state() -> AppState {
        let root = std::env::temp_dir().join(format!("moodboard_state_test_{}", uuid::Uuid::new_v4()));
        AppState::new(
            Arc::new(FsDocumentStore::new(root.join("store"))),
            Arc::new(FsObjectStore::new(root.join("objects"))),
            Arc::new(NoopRemover),
        )
    }

    #[test]
    fn app_state_constructs_with_blank_session_and_no_identity() {
        let state = make_state();
        let session = state.session.read().expect("read session lock");
        assert!(session.composition().is_empty());
        assert!(state.identity.read().expect("read identity lock").is_none());
    }

    #[test]
    fn identity_lock_allows_write() {
        let state = make_state();
        {
            let mut identity = state.identity.write().expect("write identity lock");
            *identity = Some(UserIdentity {
                uid: "u1".to_string(),
                username: "mona".to_string(),
            });
        }
        let identity = state.identity.read().expect("read identity lock");
        assert_eq!(identity.as_ref().expect("signed in").username, "mona");
    }

    #[test]
    fn user_identity_serializes_camel_case() {
        let identity = UserIdentity {
            uid: "u1".to_string(),
            username: "mona".to_string(),
        };
        let value = serde_json::to_value(&identity).expect("serialize");
        assert_eq!(value["uid"], "u1");
        assert_eq!(value["username"], "mona");
    }
}
