//! Cart
//!
//! The shopping cart shared by the menu, cart, checkout and payment pages.
//! Every mutation writes the full line list to local storage before it
//! becomes visible in memory, so a reload always sees the latest cart.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, PoisonError, RwLock},
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    ids::ProductId,
    money::Amount,
    storage::{LocalStorage, StorageError, keys},
};

mod line;

pub use line::CartLine;

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart could not be written to local storage.
    #[error("failed to persist cart")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("failed to serialize cart")]
    Serialization(#[from] serde_json::Error),
}

/// Cart lines plus their persisted copy.
pub struct CartStore {
    storage: Arc<dyn LocalStorage>,
    lines: RwLock<Vec<CartLine>>,
}

impl Debug for CartStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartStore")
            .field("lines", &self.lines())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Build the store from whatever is persisted under the `cart` key.
    ///
    /// Repeated products are folded into their first line. Unreadable
    /// persisted data is discarded: the cart starts empty and a warning is
    /// logged.
    pub fn hydrate(storage: Arc<dyn LocalStorage>) -> Self {
        let lines = match storage.get_item(keys::CART) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(persisted) => {
                    let mut lines = Vec::with_capacity(persisted.len());

                    for line in persisted {
                        merge(&mut lines, line);
                    }

                    lines
                }
                Err(error) => {
                    warn!("discarding unreadable persisted cart: {error}");

                    if let Err(error) = storage.remove_item(keys::CART) {
                        warn!("failed to remove unreadable persisted cart: {error}");
                    }

                    Vec::new()
                }
            },
        };

        Self {
            storage,
            lines: RwLock::new(lines),
        }
    }

    /// Snapshot of the current lines, in insertion order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines with a non-zero quantity.
    pub fn purchasable_lines(&self) -> Vec<CartLine> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|line| line.quantity > 0)
            .cloned()
            .collect()
    }

    /// A single line by product.
    pub fn line(&self, product: ProductId) -> Option<CartLine> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|line| line.product_id == product)
            .cloned()
    }

    /// Sum of all line quantities.
    pub fn item_count(&self) -> u64 {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Amount {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(CartLine::line_total)
            .sum()
    }

    /// Whether the cart has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Add a line, merging into an existing line for the same product.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the in-memory
    /// cart is left unchanged in that case.
    pub fn add_item(&self, line: CartLine) -> Result<(), CartError> {
        self.mutate(|lines| {
            merge(lines, line);

            true
        })
        .map(|_changed| ())
    }

    /// Replace a line's quantity. Returns `false` when the product is not in
    /// the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn update_quantity(&self, product: ProductId, quantity: u32) -> Result<bool, CartError> {
        self.mutate(|lines| {
            lines
                .iter_mut()
                .find(|line| line.product_id == product)
                .map(|line| line.quantity = quantity)
                .is_some()
        })
    }

    /// Increase a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn increment(&self, product: ProductId) -> Result<bool, CartError> {
        match self.line(product) {
            Some(line) => self.update_quantity(product, line.quantity.saturating_add(1)),
            None => Ok(false),
        }
    }

    /// Decrease a line's quantity by one, stopping at zero. The line stays in
    /// the cart until it is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn decrement(&self, product: ProductId) -> Result<bool, CartError> {
        match self.line(product) {
            Some(line) => self.update_quantity(product, line.quantity.saturating_sub(1)),
            None => Ok(false),
        }
    }

    /// Delete a line regardless of its quantity. Returns `false` when the
    /// product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn remove_item(&self, product: ProductId) -> Result<bool, CartError> {
        self.mutate(|lines| {
            let before = lines.len();
            lines.retain(|line| line.product_id != product);

            lines.len() != before
        })
    }

    /// Empty the cart and delete its persisted copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted copy could not be removed.
    pub fn clear_cart(&self) -> Result<(), CartError> {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);

        self.storage.remove_item(keys::CART)?;
        lines.clear();

        debug!("cart cleared");

        Ok(())
    }

    fn mutate(&self, apply: impl FnOnce(&mut Vec<CartLine>) -> bool) -> Result<bool, CartError> {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = lines.clone();
        let changed = apply(&mut next);

        if changed {
            self.storage
                .set_item(keys::CART, &serde_json::to_string(&next)?)?;
            *lines = next;
        }

        Ok(changed)
    }
}

fn merge(lines: &mut Vec<CartLine>, line: CartLine) {
    if let Some(existing) = lines
        .iter_mut()
        .find(|existing| existing.product_id == line.product_id)
    {
        existing.quantity = existing.quantity.saturating_add(line.quantity);
    } else {
        lines.push(line);
    }
}
