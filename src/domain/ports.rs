use std::sync::Arc;

use super::cart::{ItemId, MenuItem};
use super::errors::DomainError;

/// Origin-scoped string storage holding the persisted cart.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError>;
    fn remove_item(&self, key: &str) -> Result<(), DomainError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), DomainError> {
        (**self).remove_item(key)
    }
}

pub trait MenuLookup {
    fn find_item(&self, id: ItemId) -> Option<&MenuItem>;
}

impl MenuLookup for [MenuItem] {
    fn find_item(&self, id: ItemId) -> Option<&MenuItem> {
        self.iter().find(|item| item.id == id)
    }
}
