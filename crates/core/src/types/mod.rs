//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod publication;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::Price;
pub use publication::PublicationState;
