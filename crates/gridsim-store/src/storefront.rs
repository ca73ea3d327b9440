//! The four storefront services wired to a shared set of collaborators.

use crate::auth::AuthService;
use crate::cart::CartService;
use crate::order::OrderService;
use crate::product::ProductService;
use crate::services::StoreDeps;
use crate::types::{format_cents, Order};
use gridsim_core::Result;
use tracing::{info, warn};

pub struct Storefront {
    pub products: ProductService,
    pub auth: AuthService,
    pub carts: CartService,
    pub orders: OrderService,
}

impl Storefront {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            products: ProductService::new(deps.ids.clone()),
            auth: AuthService::new(deps.ids.clone(), deps.hasher.clone()),
            carts: CartService::new(deps.ids.clone()),
            orders: OrderService::new(deps.ids, deps.clock),
        }
    }

    /// Seed a small catalog, sign in a demo user and check out a cart.
    ///
    /// Returns `None` when the demo credentials are rejected.
    pub fn run_demo(&mut self) -> Result<Option<Order>> {
        let apple = self.products.add_product("Apple", 199, 10);
        let banana = self.products.add_product("Banana", 99, 15);
        self.products.add_product("Orange", 149, 5);

        self.auth.register_user("john.doe", "password123")?;

        let Some(user) = self.auth.authenticate("john.doe", "password123").cloned() else {
            warn!("Invalid credentials");
            return Ok(None);
        };

        let cart = self.carts.create_cart(user.id);
        self.carts.add_to_cart(cart.id, apple.id, 1)?;
        self.carts.add_to_cart(cart.id, banana.id, 2)?;

        let order = self
            .orders
            .create_order(user.id, cart.id, &self.carts, &self.products)?;

        info!(
            order_id = %order.id,
            total = %format_cents(order.total_cents),
            "Created order"
        );

        Ok(Some(order))
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new(StoreDeps::default())
    }
}
