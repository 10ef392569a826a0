use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Holds at most one bearer token. Last writer wins.
///
/// Implementations never fail: storage problems are logged and the token is
/// reported absent, which callers treat as "signed out".
pub trait SessionStore: Send + Sync {
    fn save(&self, token: &str);
    fn clear(&self);
    fn read(&self) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str) {
        match self.token.write() {
            Ok(mut guard) => *guard = Some(token.to_string()),
            Err(poisoned) => *poisoned.into_inner() = Some(token.to_string()),
        }
    }

    fn clear(&self) {
        match self.token.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn read(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Keeps the token in a file so it survives process restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create session directory {}: {}", parent.display(), e);
                return;
            }
        }

        match fs::write(&self.path, token) {
            Ok(()) => debug!("Session token written to {}", self.path.display()),
            Err(e) => warn!("Failed to persist session token to {}: {}", self.path.display(), e),
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Session file {} removed", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove session file {}: {}", self.path.display(), e),
        }
    }

    fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_last_writer_wins() {
        let store = MemorySessionStore::new();
        assert_eq!(store.read(), None);

        store.save("first");
        store.save("second");
        assert_eq!(store.read().as_deref(), Some("second"));

        store.clear();
        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_file_store_survives_new_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session");

        FileSessionStore::new(&path).save("abc.def.ghi");

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.read().as_deref(), Some("abc.def.ghi"));

        reopened.clear();
        assert_eq!(FileSessionStore::new(&path).read(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_clear_without_file_is_noop() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("missing"));

        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_file_store_blank_file_reads_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(FileSessionStore::new(path).read(), None);
    }
}
