//! Core types and utilities shared by the grid simulation and the storefront demo.

pub mod types;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
