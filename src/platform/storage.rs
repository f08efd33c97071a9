//! Key/value persistence for settings and high scores
//!
//! Values are JSON strings. Native builds keep one `<key>.json` file per key
//! under the user's data directory; web builds use LocalStorage.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ArcadeError, Result};

/// A flat string store
pub trait KeyValueStore {
    /// Raw value for `key`, `None` if never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Read and parse a JSON value
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(json) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| ArcadeError::Json {
            key: key.to_string(),
            source,
        })
}

/// Serialize and write a JSON value
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| ArcadeError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use super::KeyValueStore;
    use crate::error::{ArcadeError, Result};

    /// One JSON file per key in a directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        root: PathBuf,
    }

    impl FileStore {
        pub fn with_root(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        /// `<data dir>/retro-arcade`, falling back to the working directory
        pub fn user_default() -> Self {
            let root = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("retro-arcade");
            Self::with_root(root)
        }

        fn path(&self, key: &str) -> PathBuf {
            self.root.join(format!("{key}.json"))
        }
    }

    fn storage_error(key: &str, source: std::io::Error) -> ArcadeError {
        ArcadeError::Storage {
            key: key.to_string(),
            source,
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            match std::fs::read_to_string(self.path(key)) {
                Ok(json) => Ok(Some(json)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(storage_error(key, e)),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            std::fs::create_dir_all(&self.root).map_err(|e| storage_error(key, e))?;
            std::fs::write(self.path(key), value).map_err(|e| storage_error(key, e))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;
    use crate::error::{ArcadeError, Result};

    const PREFIX: &str = "retro_arcade_";

    /// Browser LocalStorage
    pub struct WebStore {
        storage: web_sys::Storage,
    }

    impl WebStore {
        pub fn open() -> Result<Self> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(ArcadeError::NoStorage)?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStore for WebStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.storage
                .get_item(&format!("{PREFIX}{key}"))
                .map_err(|_| ArcadeError::NoStorage)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.storage
                .set_item(&format!("{PREFIX}{key}"), value)
                .map_err(|_| ArcadeError::NoStorage)
        }
    }
}
