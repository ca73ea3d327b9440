//! Order processing.

use crate::cart::CartService;
use crate::product::ProductService;
use crate::services::{Clock, IdGenerator};
use crate::types::{CartId, Order, OrderId, UserId};
use gridsim_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub struct OrderService {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    orders: HashMap<OrderId, Order>,
    placed: Vec<OrderId>,
}

impl OrderService {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ids,
            clock,
            orders: HashMap::new(),
            placed: Vec::new(),
        }
    }

    /// Place an order for the current contents of a cart
    pub fn create_order(
        &mut self,
        user_id: UserId,
        cart_id: CartId,
        carts: &CartService,
        products: &ProductService,
    ) -> Result<Order> {
        let cart = carts
            .get_cart(cart_id)
            .ok_or_else(|| Error::NotFound(format!("cart {}", cart_id)))?;
        if cart.user_id != user_id {
            return Err(Error::Validation(format!(
                "cart {} does not belong to user {}",
                cart_id, user_id
            )));
        }

        let order = Order {
            id: OrderId(self.ids.next_id()),
            user_id,
            cart_id,
            total_cents: carts.cart_total(cart_id, products)?,
            created_at: self.clock.now(),
        };

        info!(
            event = "order_created",
            order_id = %order.id,
            user_id = %user_id,
            total_cents = order.total_cents,
            "Order created"
        );

        self.placed.push(order.id);
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// A user's orders, oldest first
    pub fn user_orders(&self, user_id: UserId) -> Vec<&Order> {
        self.all_orders()
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect()
    }

    pub fn all_orders(&self) -> Vec<&Order> {
        self.placed
            .iter()
            .filter_map(|id| self.orders.get(id))
            .collect()
    }
}
