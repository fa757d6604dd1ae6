use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::errors::DomainError;
use crate::domain::ports::KeyValueStore;

/// Process-local storage. Contents vanish with the process, like a
/// session-scoped browser store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>, DomainError> {
        self.entries
            .read()
            .map_err(|_| DomainError::Storage("memory storage lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>, DomainError> {
        self.entries
            .write()
            .map_err(|_| DomainError::Storage("memory storage lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), DomainError> {
        self.write()?.remove(key);
        Ok(())
    }
}
