//! Bearer token slot shared by all sub-clients, with a pluggable
//! persistence boundary so a session can survive a process restart

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::warn;

/// Persistence boundary for the raw token string.
///
/// Implementations hold at most one token. Failures to persist are logged and
/// swallowed: the token cache is best-effort, the in-memory slot stays
/// authoritative for the lifetime of the process.
pub trait TokenStorage: Send + Sync {
    /// Read the persisted token, if any
    fn load(&self) -> Option<String>;

    /// Persist the token, replacing any previous one
    fn save(&self, token: &str);

    /// Remove the persisted token
    fn clear(&self);
}

impl<S: TokenStorage> TokenStorage for Arc<S> {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, token: &str) {
        (**self).save(token)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// In-memory storage; nothing survives the process. Used in tests and for
/// callers that do not want sessions restored across runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> Option<String> {
        self.slot.lock().unwrap().clone()
    }

    fn save(&self, token: &str) {
        *self.slot.lock().unwrap() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap() = None;
    }
}

/// File-backed storage holding the raw token at a fixed path
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a storage backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStorage for FileStorage {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }

    fn save(&self, token: &str) {
        if let Err(err) = fs::write(&self.path, token) {
            warn!("failed to persist token to {}: {}", self.path.display(), err);
        }
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != ErrorKind::NotFound {
                warn!("failed to clear persisted token at {}: {}", self.path.display(), err);
            }
        }
    }
}

/// Process-wide holder of the current bearer token.
///
/// Written only by the session manager; read synchronously at request-build
/// time by the HTTP layer. No validation happens here.
pub struct TokenStore {
    current: Mutex<Option<String>>,
    storage: Box<dyn TokenStorage>,
}

impl TokenStore {
    /// Create a token store over the given persistence boundary
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            current: Mutex::new(None),
            storage,
        }
    }

    /// The current token, if any
    pub fn get(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    /// Replace the token. `None` clears both the in-memory slot and the
    /// persisted copy.
    pub fn set(&self, token: Option<&str>) {
        let mut current = self.current.lock().unwrap();
        match token {
            Some(token) => {
                *current = Some(token.to_string());
                self.storage.save(token);
            }
            None => {
                *current = None;
                self.storage.clear();
            }
        }
    }

    /// Read the persisted token without touching the in-memory slot; used by
    /// session restore at process start.
    pub(crate) fn load_persisted(&self) -> Option<String> {
        self.storage.load()
    }
}
