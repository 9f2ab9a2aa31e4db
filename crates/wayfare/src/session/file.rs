//! File-backed session store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{SessionResult, SessionStore};

/// Session store persisted as a flat JSON object.
///
/// The file is re-read on every access so a logout performed by another
/// process is visible on the next read. Writes go to a sibling temp file that
/// is renamed over the original.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> SessionResult<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&contents) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!(
                    "ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> SessionResult<()> {
        if values.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => {
                    debug!("Removed session file {}", self.path.display());
                    Ok(())
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let body = serde_json::to_vec_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &body)?;
        restrict_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} bytes to {}", body.len(), self.path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn get_many(&self, keys: &[&str]) -> SessionResult<Vec<Option<String>>> {
        let mut values = self.load()?;
        Ok(keys.iter().map(|key| values.remove(*key)).collect())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.apply(&[(key, Some(value))])
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        self.apply(&[(key, None)])
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> SessionResult<()> {
        let mut values = self.load()?;
        let before = values.clone();
        for (key, value) in changes {
            match value {
                Some(value) => {
                    values.insert(key.to_string(), value.to_string());
                }
                None => {
                    values.remove(*key);
                }
            }
        }

        if values == before {
            return Ok(());
        }
        self.save(&values)
    }
}
