//! Essenza Core - Shared types library.
//!
//! This crate provides the common types used across all Essenza components:
//! - `storefront` - The storefront state layer (containers, persistence, checkout)
//! - `integration-tests` - Cross-component scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, statuses,
//!   and line items
//! - [`collection`] - The pure, ordered, id-unique line-item collection engine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collection;
pub mod types;

pub use collection::Collection;
pub use types::*;
