pub mod collage;
pub mod commands;
pub mod editor;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use services::RemoveBgClient;
use state::AppState;
use store::{FsDocumentStore, FsObjectStore};

/// Moodboard Tauri application library entry point.
///
/// All Tauri builder setup lives here so it can be tested and referenced
/// by the thin `main.rs` binary wrapper.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // ── Tracing setup (must happen before anything else) ────────────────────
    //
    // Logs are written to a rolling-never (single) file in the OS data dir:
    //   Linux    ~/.local/share/moodboard/moodboard.log
    //   macOS    ~/Library/Application Support/moodboard/moodboard.log
    //   Windows  %LOCALAPPDATA%\moodboard\moodboard.log
    //
    // Log level is controlled by the RUST_LOG environment variable;
    // defaults to INFO when the variable is absent.
    let log_dir = dirs::data_local_dir().unwrap_or_default().join("moodboard");

    // Ensure the log directory exists before handing it to the appender.
    // tracing_appender::rolling::never panics if it cannot open the log file,
    // so we create the directory tree first.
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::never(&log_dir, "moodboard.log");
    let (non_blocking, _tracing_guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .init();

    tracing::info!("Moodboard starting");

    // ── Application state ────────────────────────────────────────────────────
    let state = AppState::new(
        Arc::new(FsDocumentStore::new(FsDocumentStore::default_root())),
        Arc::new(FsObjectStore::new(FsObjectStore::default_root())),
        Arc::new(RemoveBgClient::from_env()),
    );

    // ── Tauri builder ────────────────────────────────────────────────────────
    tauri::Builder::default()
        .manage(state)
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .invoke_handler(tauri::generate_handler![
            commands::session::set_identity,
            commands::session::clear_identity,
            commands::session::new_session,
            commands::session::open_board,
            commands::session::open_draft,
            commands::session::open_published,
            commands::session::get_session_snapshot,
            commands::edit::add_layer,
            commands::edit::import_collage,
            commands::edit::move_layer,
            commands::edit::resize_layer,
            commands::edit::flip_layer,
            commands::edit::rotate_layer,
            commands::edit::set_layer_opacity,
            commands::edit::remove_layer,
            commands::edit::undo,
            commands::edit::redo,
            commands::edit::select_layer,
            commands::edit::clear_selection,
            commands::publish::save_draft,
            commands::publish::post_collage,
            commands::publish::delete_draft,
            commands::publish::delete_board,
            commands::publish::remove_background,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#[cfg(test)]
mod tests {
    /// Verify that serde serialisation round-trips a simple value.
    #[test]
    fn serde_round_trip() {
        let original = serde_json::json!({ "name": "Moodboard", "version": 1 });
        let serialised = serde_json::to_string(&original).expect("serialise");
        let recovered: serde_json::Value =
            serde_json::from_str(&serialised).expect("deserialise");
        assert_eq!(original, recovered);
    }
}
