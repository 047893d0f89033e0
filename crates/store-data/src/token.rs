//! Bearer token persistence.

use crate::FetchError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Where the session token lives between requests.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<SecretString>;
    fn save(&self, token: SecretString) -> Result<(), FetchError>;
    fn clear(&self) -> Result<(), FetchError>;
}

/// Token kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, token: SecretString) -> Result<(), FetchError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), FetchError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Token persisted as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<SecretString> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let file: TokenFile = serde_json::from_str(&content).ok()?;
        if file.token.is_empty() {
            None
        } else {
            Some(SecretString::from(file.token))
        }
    }

    fn save(&self, token: SecretString) -> Result<(), FetchError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| FetchError::StorageError(e.to_string()))?;
        }
        let file = TokenFile {
            token: token.expose_secret().to_string(),
        };
        let content = serde_json::to_string(&file)?;
        std::fs::write(&self.path, content).map_err(|e| FetchError::StorageError(e.to_string()))
    }

    fn clear(&self) -> Result<(), FetchError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FetchError::StorageError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());

        store.save(SecretString::from("abc")).unwrap();
        assert_eq!(store.load().unwrap().expose_secret(), "abc");

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("store-token-{}", std::process::id()));
        let store = FileTokenStore::new(dir.join("nested/session.json"));

        assert!(store.load().is_none());
        store.save(SecretString::from("tok-1")).unwrap();
        assert_eq!(store.load().unwrap().expose_secret(), "tok-1");

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }
}
