//! Last-used root persistence.
//!
//! The scan pipeline never touches this module; the CLI resolves its root
//! through a [`StateStore`] and remembers it afterwards. Every failure here
//! is swallowed: a broken state file only costs the user the default root.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the fallback state file in the working directory.
pub const LOCAL_STATE_FILE: &str = ".ctxpick_state.json";

/// Load/save port for the last used scan root.
pub trait StateStore {
    /// Previously saved root, if any could be read.
    fn load(&self) -> Option<PathBuf>;

    /// Persist `root`. Best effort.
    fn save(&self, root: &Path);
}

#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    last_path: PathBuf,
}

/// State stored as `{"last_path": "..."}` in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user config directory, or the working directory
    /// when no config directory is known.
    pub fn default_location() -> Self {
        let path = dirs::config_dir()
            .map(|dir| dir.join("ctxpick").join("state.json"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_STATE_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Option<PathBuf> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("no state at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<StateDocument>(&raw) {
            Ok(doc) => Some(doc.last_path),
            Err(e) => {
                log::debug!("ignoring malformed state {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, root: &Path) {
        let doc = StateDocument {
            last_path: root.to_path_buf(),
        };

        let result = serde_json::to_string(&doc)
            .map_err(std::io::Error::from)
            .and_then(|json| {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, json)
            });

        if let Err(e) = result {
            log::debug!("could not save state to {}: {}", self.path.display(), e);
        }
    }
}

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    last: RefCell<Option<PathBuf>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            last: RefCell::new(Some(path.into())),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Option<PathBuf> {
        self.last.borrow().clone()
    }

    fn save(&self, root: &Path) {
        *self.last.borrow_mut() = Some(root.to_path_buf());
    }
}

/// Pick the scan root: explicit argument, then the stored root, then the
/// current directory.
pub fn resolve_root(explicit: Option<PathBuf>, store: &dyn StateStore) -> PathBuf {
    explicit
        .or_else(|| store.load())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Save `root` if it is an existing directory that differs from `previous`.
///
/// Returns whether a save was attempted.
pub fn remember_root(store: &dyn StateStore, root: &Path, previous: Option<&Path>) -> bool {
    if !root.is_dir() || previous == Some(root) {
        return false;
    }
    store.save(root);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = JsonStateStore::new(temp.path().join("nested/state.json"));

        assert_eq!(store.load(), None);
        store.save(Path::new("/srv/project"));
        assert_eq!(store.load(), Some(PathBuf::from("/srv/project")));

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["last_path"], "/srv/project");
    }

    #[test]
    fn test_malformed_state_is_ignored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(JsonStateStore::new(&path).load(), None);

        fs::write(&path, r#"{"other": 1}"#).unwrap();
        assert_eq!(JsonStateStore::new(&path).load(), None);
    }

    #[test]
    fn test_save_failure_is_silent() {
        let temp = TempDir::new().unwrap();
        // parent is a file, so create_dir_all fails
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = JsonStateStore::new(blocker.join("state.json"));
        store.save(Path::new("/tmp"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_resolve_root_precedence() {
        let store = MemoryStateStore::with_path("/stored");
        assert_eq!(
            resolve_root(Some(PathBuf::from("/explicit")), &store),
            PathBuf::from("/explicit")
        );
        assert_eq!(resolve_root(None, &store), PathBuf::from("/stored"));
        assert_eq!(resolve_root(None, &MemoryStateStore::new()), PathBuf::from("."));
    }

    #[test]
    fn test_remember_root_only_on_change() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStateStore::new();

        assert!(remember_root(&store, temp.path(), None));
        assert_eq!(store.load().as_deref(), Some(temp.path()));

        assert!(!remember_root(&store, temp.path(), Some(temp.path())));
        assert!(!remember_root(&store, &temp.path().join("missing"), None));
    }
}
