//! Durable storage for the login token and username.
//!
//! Two keys survive restarts, `token` and `username`. Everything else about
//! the session is transient.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Persisted login identity.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl StoredCredentials {
    /// Creates a record holding both keys.
    pub fn new(username: String, token: String) -> Self {
        Self {
            token: Some(token),
            username: Some(username),
        }
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .finish()
    }
}

/// Key-value storage that outlives the process.
pub trait CredentialStore: Send + fmt::Debug {
    /// Reads the stored identity; an empty record when nothing is stored.
    fn load(&self) -> Result<StoredCredentials, StorageError>;

    /// Replaces the stored identity.
    fn save(&mut self, credentials: &StoredCredentials) -> Result<(), StorageError>;

    /// Removes both keys.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Credentials kept in a TOML file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by the file at `path`. The file need not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<StoredCredentials, StorageError> {
        if !self.path.exists() {
            debug!("No credentials file yet");
            return Ok(StoredCredentials::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StorageError::new(format!("Failed to read credentials: {}", e)))?;
        let credentials: StoredCredentials = toml::from_str(&content)
            .map_err(|e| StorageError::new(format!("Failed to parse credentials: {}", e)))?;

        debug!(has_token = credentials.token.is_some(), "Credentials loaded");
        Ok(credentials)
    }

    #[instrument(skip(self, credentials), fields(path = %self.path.display()))]
    fn save(&mut self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = toml::to_string(credentials)
            .map_err(|e| StorageError::new(format!("Failed to encode credentials: {}", e)))?;
        std::fs::write(&self.path, content)
            .map_err(|e| StorageError::new(format!("Failed to write credentials: {}", e)))?;

        info!("Credentials saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&mut self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Credentials removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credentials to remove");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to remove credentials");
                Err(StorageError::new(format!(
                    "Failed to remove credentials: {}",
                    e
                )))
            }
        }
    }
}

/// In-process store. Clones share the same record, so a test can keep one
/// handle while the session store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<Mutex<StoredCredentials>>,
}

impl MemoryCredentialStore {
    /// Creates a store pre-populated with `credentials`.
    pub fn with(credentials: StoredCredentials) -> Self {
        Self {
            inner: Arc::new(Mutex::new(credentials)),
        }
    }

    /// Returns a copy of the current record.
    pub fn snapshot(&self) -> StoredCredentials {
        self.inner
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<StoredCredentials, StorageError> {
        self.inner
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| StorageError::new("Credential store lock poisoned".to_string()))
    }

    fn save(&mut self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| StorageError::new("Credential store lock poisoned".to_string()))?;
        *guard = credentials.clone();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.save(&StoredCredentials::default())
    }
}

/// Credential storage error.
#[derive(Debug, Clone, Display, Error)]
#[display("Storage error: {} at {}:{}", message, file, line)]
pub struct StorageError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StorageError {
    /// Creates a new storage error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
