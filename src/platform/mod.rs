//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time
//! - Input events
//! - Storage (LocalStorage on web, JSON files natively)

pub mod input;
pub mod storage;

pub use input::{InputEvent, Key};
pub use storage::{KeyValueStore, load_json, save_json};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::WebStore;

/// Wall-clock milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
