use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::errors::DomainError;
use crate::domain::ports::KeyValueStore;

/// Durable storage rooted at one directory, one `<key>.json` file per key.
///
/// The directory plays the role of a browser origin: everything written
/// survives restarts until the directory itself is wiped.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (creating if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::info!("Using file cart storage at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DomainError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::InvalidInput(format!(
                "storage key '{}' may only contain letters, digits, '-' and '_'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let path = self.path_for(key)?;
        // Uniquely named temp file, then rename: readers never see a partial
        // value and concurrent writers end up last-write-wins.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), DomainError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cart_store::CartStore;
    use crate::domain::menu::Menu;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::open(dir.path()).expect("open");

        assert_eq!(storage.get_item("cart").expect("get"), None);
    }

    #[test]
    fn set_writes_one_file_per_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::open(dir.path()).expect("open");

        storage.set_item("cart", "[]").expect("set");

        let on_disk = fs::read_to_string(dir.path().join("cart.json")).expect("read");
        assert_eq!(on_disk, "[]");
        let entries = fs::read_dir(dir.path()).expect("read_dir").count();
        assert_eq!(entries, 1, "no temp files left behind");
    }

    #[test]
    fn concurrent_writers_sharing_a_directory_all_succeed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let storage = FileStorage::open(dir.path()).expect("open");
                std::thread::spawn(move || {
                    for round in 0..25 {
                        storage
                            .set_item("cart", &format!("[{}, {}]", n, round))
                            .expect("every write should land");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        let storage = FileStorage::open(dir.path()).expect("open");
        let last = storage.get_item("cart").expect("get").expect("cart written");
        assert!(last.ends_with(", 24]"), "unexpected final value {}", last);
        assert_eq!(fs::read_dir(dir.path()).expect("read_dir").count(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::open(dir.path()).expect("open");
        storage.set_item("cart", "[]").expect("set");

        storage.remove_item("cart").expect("remove");
        storage.remove_item("cart").expect("remove twice");

        assert_eq!(storage.get_item("cart").expect("get"), None);
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("origin").join("store");

        let storage = FileStorage::open(&nested).expect("open");

        assert!(nested.is_dir());
        assert_eq!(storage.dir(), nested.as_path());
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::open(dir.path()).expect("open");

        for key in ["", "../cart", "a/b", "cart.json"] {
            let err = storage.set_item(key, "[]").expect_err("invalid key");
            assert!(matches!(err, DomainError::InvalidInput(_)), "key {:?}", key);
        }
    }

    #[test]
    fn cart_survives_reopening_the_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let menu = Menu::restaurant();
        {
            let store = CartStore::new(FileStorage::open(dir.path()).expect("open"));
            store.add_to_cart(1, &menu).expect("add");
            store.add_to_cart(1, &menu).expect("add");
            store.update_item_selection(1, false).expect("select");
        }

        let reopened = CartStore::new(FileStorage::open(dir.path()).expect("reopen"));
        let cart = reopened.get_cart();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert!(!cart.lines()[0].selected);
    }

    #[test]
    fn corrupted_file_reads_as_empty_cart() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("cart.json"), "[{\"id\":").expect("write");

        let store = CartStore::new(FileStorage::open(dir.path()).expect("open"));

        assert!(store.get_cart().is_empty());
    }
}
