use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::objects::KeyValueStore;

/// Directory-backed store: one file per key.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(format!("{}.json", file_stem(key)?)))
    }
}

/// Map a key onto a file name. Characters outside `[A-Za-z0-9_-]` become `_`.
fn file_stem(key: &str) -> Result<String, StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), bytes = contents.len(), "read key");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value.as_bytes())?;
        std::fs::rename(&tmp_path, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_replaces_unsafe_characters() {
        assert_eq!(file_stem("flowchef_saved_recipes").unwrap(), "flowchef_saved_recipes");
        assert_eq!(file_stem("../etc/passwd").unwrap(), "___etc_passwd");
        assert_eq!(file_stem("a b.c").unwrap(), "a_b_c");
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(file_stem(""), Err(StorageError::InvalidKey(_))));
    }
}
