//! In-memory storefront: products, users, carts and orders.
//!
//! Every service is an explicit object built from injected collaborators
//! (id generator, clock, password hasher) so tests can swap them out.

pub mod auth;
pub mod cart;
pub mod order;
pub mod product;
pub mod services;
pub mod storefront;
pub mod types;

pub use auth::AuthService;
pub use cart::CartService;
pub use order::OrderService;
pub use product::ProductService;
pub use services::{
    Blake3Hasher, Clock, FixedClock, IdGenerator, PasswordHasher, SequentialIds, StoreDeps,
    SystemClock, UuidV4,
};
pub use storefront::Storefront;
pub use types::*;
