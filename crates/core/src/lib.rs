//! Wardrobe Core - Shared types library.
//!
//! This crate provides the domain types shared by:
//! - `storefront` - Directus GraphQL client (profile, products, categories)
//! - `cli` - Command-line screens over the storefront client
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
