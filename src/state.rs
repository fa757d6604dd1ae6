use std::sync::Arc;

use crate::application::cart_store::{CartStore, DEFAULT_CART_KEY};
use crate::config::AppConfig;
use crate::domain::errors::DomainError;
use crate::domain::menu::Menu;
use crate::domain::ports::KeyValueStore;
use crate::infrastructure::file_storage::FileStorage;
use crate::infrastructure::memory_storage::MemoryStorage;

pub type SharedStorage = Arc<dyn KeyValueStore>;

/// Built once at startup and handed to every handler through `web::Data`.
pub struct AppState {
    pub cart: CartStore<SharedStorage>,
    pub menu: Menu,
}

impl AppState {
    pub fn new(storage: SharedStorage, storage_key: &str, menu: Menu) -> Self {
        Self {
            cart: CartStore::with_key(storage, storage_key),
            menu,
        }
    }

    pub fn in_memory(menu: Menu) -> Self {
        Self::new(Arc::new(MemoryStorage::new()), DEFAULT_CART_KEY, menu)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let storage: SharedStorage = match &config.storage_dir {
            Some(dir) => Arc::new(FileStorage::open(dir.clone())?),
            None => {
                log::info!("CART_STORAGE_DIR not set, cart lives in memory only");
                Arc::new(MemoryStorage::new())
            }
        };
        Ok(Self::new(storage, &config.storage_key, Menu::restaurant()))
    }
}
