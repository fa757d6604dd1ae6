use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::cart::{Cart, CartLine, ItemId};
use crate::domain::errors::DomainError;
use crate::domain::ports::{KeyValueStore, MenuLookup};

pub const DEFAULT_CART_KEY: &str = "cart";

/// Single source of truth for cart contents.
///
/// Every operation reads the whole cart from storage, changes it and writes
/// the whole cart back. The internal lock serializes those cycles so that
/// handlers running on different workers never interleave.
pub struct CartStore<S> {
    storage: S,
    key: String,
    lock: Mutex<()>,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the persisted cart. Missing, unreadable or malformed state is
    /// an empty cart.
    pub fn get_cart(&self) -> Cart {
        let _guard = self.guard();
        self.load()
    }

    pub fn save_cart(&self, cart: &Cart) -> Result<(), DomainError> {
        let _guard = self.guard();
        self.store(cart)
    }

    /// Adds one unit of `item_id`, creating a selected line if the cart does
    /// not hold it yet.
    pub fn add_to_cart<M>(&self, item_id: ItemId, menu: &M) -> Result<(), DomainError>
    where
        M: MenuLookup + ?Sized,
    {
        let item = menu
            .find_item(item_id)
            .ok_or(DomainError::ItemNotFound(item_id))?;

        self.modify(|cart| match cart.find_mut(item_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => cart.push(CartLine::from_menu_item(item)),
        })?;

        log::debug!("Added item {} to cart", item_id);
        Ok(())
    }

    /// Sets the quantity of an existing line. Zero or less removes the line.
    pub fn update_item_quantity(&self, item_id: ItemId, new_quantity: i64) -> Result<(), DomainError> {
        self.modify(|cart| apply_quantity(cart, item_id, new_quantity))?;
        log::debug!("Set quantity of item {} to {}", item_id, new_quantity);
        Ok(())
    }

    /// Shifts the quantity of an existing line by `change`, removing it when
    /// the result drops to zero or below.
    pub fn adjust_item_quantity(&self, item_id: ItemId, change: i64) -> Result<(), DomainError> {
        let _guard = self.guard();
        let mut cart = self.load();

        let current = cart
            .find(item_id)
            .map(|line| i64::from(line.quantity))
            .ok_or(DomainError::LineNotFound(item_id))?;
        apply_quantity(&mut cart, item_id, current.saturating_add(change));

        self.store(&cart)?;
        log::debug!("Adjusted quantity of item {} by {}", item_id, change);
        Ok(())
    }

    pub fn remove_item_from_cart(&self, item_id: ItemId) -> Result<(), DomainError> {
        self.modify(|cart| cart.remove(item_id))?;
        log::debug!("Removed item {} from cart", item_id);
        Ok(())
    }

    /// Deletes the storage key itself rather than persisting an empty cart.
    pub fn clear_cart(&self) -> Result<(), DomainError> {
        let _guard = self.guard();
        self.storage.remove_item(&self.key)?;
        log::debug!("Cleared cart '{}'", self.key);
        Ok(())
    }

    /// Drops every selected line, keeping the unselected ones in their
    /// original order.
    pub fn clear_selected_items(&self) -> Result<(), DomainError> {
        self.modify(|cart| cart.retain(|line| !line.selected))?;
        log::debug!("Cleared selected items from cart");
        Ok(())
    }

    /// Nothing is written when the cart has no line for `item_id`.
    pub fn update_item_selection(&self, item_id: ItemId, selected: bool) -> Result<(), DomainError> {
        let _guard = self.guard();
        let mut cart = self.load();

        let Some(line) = cart.find_mut(item_id) else {
            return Ok(());
        };
        line.selected = selected;

        self.store(&cart)?;
        log::debug!("Set selection of item {} to {}", item_id, selected);
        Ok(())
    }

    fn modify<F>(&self, f: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Cart),
    {
        let _guard = self.guard();
        let mut cart = self.load();
        f(&mut cart);
        self.store(&cart)
    }

    fn load(&self) -> Cart {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                log::warn!("Failed to read cart '{}', using an empty cart: {}", self.key, e);
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(mut cart) => {
                let before = cart.len();
                cart.retain(|line| line.quantity > 0);
                if cart.len() != before {
                    log::warn!("Dropped {} empty line(s) from cart '{}'", before - cart.len(), self.key);
                }
                cart
            }
            Err(e) => {
                log::warn!("Malformed cart '{}', using an empty cart: {}", self.key, e);
                Cart::new()
            }
        }
    }

    fn store(&self, cart: &Cart) -> Result<(), DomainError> {
        let raw = serde_json::to_string(cart)?;
        self.storage.set_item(&self.key, &raw)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn apply_quantity(cart: &mut Cart, item_id: ItemId, new_quantity: i64) {
    if new_quantity <= 0 {
        cart.remove(item_id);
    } else if let Some(line) = cart.find_mut(item_id) {
        line.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
    }
}
