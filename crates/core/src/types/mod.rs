//! Core types for Essenza.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod item;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use item::{CartItem, LineItem, WishlistItem};
pub use price::{CurrencyCode, Price};
pub use status::*;
