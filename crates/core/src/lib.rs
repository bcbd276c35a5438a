//! Mãos de Fada Core - Shared types library.
//!
//! This crate provides the common types used across the shop components:
//! - `storefront` - Public catalog, cart and WhatsApp checkout
//! - `admin` - Internal administration panel (product CRUD)
//!
//! # Architecture
//!
//! The core crate contains only types and pure catalog logic - no I/O, no
//! HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, prices, categories and image payloads
//! - [`cart`] - In-session shopping cart state and its operations
//! - [`doc`] - Mapping between products and catalog store documents

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod doc;
pub mod types;

pub use types::*;
