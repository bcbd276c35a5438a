//! Core types for the Mãos de Fada shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod image;
pub mod price;
pub mod product;

pub use category::{Category, CategoryError};
pub use id::{DocId, ProductId};
pub use image::ImageData;
pub use price::{Price, PriceError};
pub use product::{Product, next_product_id, sort_for_display};
