//! External service clients.

pub mod background;

pub use background::{fetch_image_bytes, BackgroundRemover, RemoveBgClient};
