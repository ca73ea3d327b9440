//! Product catalog.

use crate::services::IdGenerator;
use crate::types::{Product, ProductId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct ProductService {
    ids: Arc<dyn IdGenerator>,
    products: HashMap<ProductId, Product>,
    order: Vec<ProductId>,
}

impl ProductService {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            products: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn add_product(&mut self, name: impl Into<String>, price_cents: u64, quantity: u32) -> Product {
        let product = Product {
            id: ProductId(self.ids.next_id()),
            name: name.into(),
            price_cents,
            quantity,
        };

        debug!(product_id = %product.id, name = %product.name, price_cents, "Product added");
        self.order.push(product.id);
        self.products.insert(product.id, product.clone());
        product
    }

    /// Remove a product. Unknown ids are ignored.
    pub fn remove_product(&mut self, id: ProductId) -> Option<Product> {
        let removed = self.products.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        debug!(product_id = %id, "Product removed");
        Some(removed)
    }

    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Products in the order they were added
    pub fn all_products(&self) -> Vec<&Product> {
        self.order
            .iter()
            .filter_map(|id| self.products.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
