//! Wardrobe storefront client library.
//!
//! Talks to the Directus backend over GraphQL, either directly or through
//! the local development proxy, and provides the profile, product, boutique
//! and terminal screens' data flows as plain async functions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod config;
pub mod directus;
pub mod profile;

pub use assets::AssetTransform;
pub use config::{ConfigError, StorefrontConfig};
pub use directus::{
    Boutique, BoutiqueRef, Category, Endpoint, GraphQLError, Product, ProductQuery,
    ProductSummary, ProfileUpdate, Role, StorefrontClient, StorefrontError, Terminal,
    TerminalRegistration, TerminalSync, UpdatedProfile, User,
};
pub use profile::ProfileForm;
