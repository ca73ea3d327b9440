//! Shopping carts.

use crate::product::ProductService;
use crate::services::IdGenerator;
use crate::types::{Cart, CartId, CartItem, ProductId, UserId};
use gridsim_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct CartService {
    ids: Arc<dyn IdGenerator>,
    carts: HashMap<CartId, Cart>,
}

impl CartService {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            carts: HashMap::new(),
        }
    }

    pub fn create_cart(&mut self, user_id: UserId) -> Cart {
        let cart = Cart {
            id: CartId(self.ids.next_id()),
            user_id,
            items: Vec::new(),
        };

        debug!(cart_id = %cart.id, user_id = %user_id, "Cart created");
        self.carts.insert(cart.id, cart.clone());
        cart
    }

    pub fn get_cart(&self, id: CartId) -> Option<&Cart> {
        self.carts.get(&id)
    }

    /// Add units of a product, merging with an existing line
    pub fn add_to_cart(&mut self, cart_id: CartId, product_id: ProductId, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(Error::Validation("quantity must be positive".to_string()));
        }
        let cart = self.cart_mut(cart_id)?;

        match cart.items.iter().position(|item| item.product_id == product_id) {
            Some(index) => {
                let line = &mut cart.items[index];
                line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                    Error::Validation(format!(
                        "quantity of {} in cart {} would overflow",
                        product_id, cart_id
                    ))
                })?;
            }
            None => cart.items.push(CartItem {
                product_id,
                quantity,
            }),
        }

        debug!(cart_id = %cart_id, product_id = %product_id, quantity, "Added to cart");
        Ok(())
    }

    /// Take units of a product out of a cart. The line is dropped when it
    /// reaches zero; products not in the cart are ignored.
    pub fn remove_from_cart(&mut self, cart_id: CartId, product_id: ProductId, quantity: u32) -> Result<()> {
        let cart = self.cart_mut(cart_id)?;

        let Some(index) = cart.items.iter().position(|item| item.product_id == product_id) else {
            return Ok(());
        };

        if cart.items[index].quantity <= quantity {
            cart.items.remove(index);
        } else {
            cart.items[index].quantity -= quantity;
        }

        debug!(cart_id = %cart_id, product_id = %product_id, quantity, "Removed from cart");
        Ok(())
    }

    /// Total price in cents. Products missing from the catalog count as zero.
    pub fn cart_total(&self, cart_id: CartId, products: &ProductService) -> Result<u64> {
        let cart = self
            .get_cart(cart_id)
            .ok_or_else(|| Error::NotFound(format!("cart {}", cart_id)))?;

        cart.items
            .iter()
            .filter_map(|item| {
                products
                    .get_product(item.product_id)
                    .map(|product| product.price_cents.checked_mul(item.quantity as u64))
            })
            .try_fold(0u64, |total, line| line.and_then(|cents| total.checked_add(cents)))
            .ok_or_else(|| Error::ResourceExhausted(format!("total of cart {} overflows", cart_id)))
    }

    fn cart_mut(&mut self, id: CartId) -> Result<&mut Cart> {
        self.carts
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("cart {}", id)))
    }
}
