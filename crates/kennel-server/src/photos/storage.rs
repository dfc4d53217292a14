//! Filesystem-level image storage.
//!
//! Images live flat under one base directory, addressed by their stored
//! file name. Names are checked before use so a stored name can never
//! point outside the directory.

use std::path::{Component, Path, PathBuf};

use kennel_core::{Error, Result};

/// Where uploaded image bytes are kept.
pub trait FileStore: Send + Sync {
    /// Directory that holds the stored files.
    fn base_dir(&self) -> &Path;

    /// Full path for a stored file name. Rejects names that are not a single
    /// plain path segment.
    fn resolve(&self, file_name: &str) -> Result<PathBuf>;

    /// Write (or overwrite) a file and return its full path.
    fn write(&self, file_name: &str, data: &[u8]) -> Result<PathBuf>;

    /// Remove a file. Returns `false` if it did not exist.
    fn remove(&self, file_name: &str) -> Result<bool>;
}

/// [`FileStore`] over a local directory.
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    base_dir: PathBuf,
}

impl DiskFileStore {
    /// Create a store rooted at `base_dir`. The directory is created lazily
    /// on first write.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }
}

impl FileStore for DiskFileStore {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(file_name).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || file_name.contains(['/', '\\']) {
            return Err(Error::Validation(format!(
                "invalid stored file name: {file_name:?}"
            )));
        }
        Ok(self.base_dir.join(file_name))
    }

    fn write(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(file_name)?;
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::write(&path, data)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Stored image file");
        Ok(path)
    }

    fn remove(&self, file_name: &str) -> Result<bool> {
        let path = self.resolve(file_name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed image file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_plain_names() {
        let store = DiskFileStore::new(PathBuf::from("/data/photos"));
        let path = store.resolve("3_abc.jpg").unwrap();
        assert_eq!(path, PathBuf::from("/data/photos/3_abc.jpg"));
    }

    #[test]
    fn resolve_rejects_escaping_names() {
        let store = DiskFileStore::new(PathBuf::from("/data/photos"));
        for bad in ["", ".", "..", "../etc/passwd", "a/b.jpg", "a\\b.jpg", "/abs.png"] {
            let result = store.resolve(bad);
            assert!(
                matches!(result, Err(Error::Validation(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn write_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path().join("nested").join("photos"));

        let path = store.write("1_x.png", b"\x89PNG data").unwrap();
        assert!(path.starts_with(store.base_dir()));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG data");
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path().to_path_buf());

        store.write("1_x.jpg", b"first version").unwrap();
        let path = store.write("1_x.jpg", b"second").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn remove_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path().to_path_buf());

        store.write("2_y.jpg", b"\xFF\xD8\xFF").unwrap();
        assert!(store.remove("2_y.jpg").unwrap());
        assert!(!store.resolve("2_y.jpg").unwrap().exists());
        assert!(!store.remove("2_y.jpg").unwrap());
    }
}
