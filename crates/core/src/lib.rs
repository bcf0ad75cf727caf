//! Under The Hood Core - Shared domain types and the cart model.
//!
//! This crate provides the pieces of the storefront that carry real
//! behavioural contracts, kept free of HTTP and template concerns:
//! - `storefront` - Server-rendered site (routes, CMS client, templates)
//! - `integration-tests` - End-to-end tests against a stub CMS
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no network access and no
//! web framework. Persistence is injected through [`cart::CartStorage`], so the
//! cart can be exercised in isolation.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, email addresses, publication states
//! - [`cart`] - Line items, the cart store, its storage slot and change events

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartEvent, CartLineItem, CartStorage, CartStore, MemoryStorage};
pub use types::*;
