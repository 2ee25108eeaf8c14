//! SpotFit Core - Shared domain types library.
//!
//! This crate provides common types used across all SpotFit components:
//! - `storefront` - Public-facing e-commerce service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure business logic - no I/O, no
//! database access, no HTTP clients. The cart calculus and address
//! validation live here so every invariant is testable without a running
//! service.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, pincodes,
//!   emails, and statuses
//! - [`product`] - Product model as served by the backend catalog API
//! - [`address`] - Shipping addresses and field-completeness validation
//! - [`cart`] - Cart lines, stock-clamped mutations, and totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod cart;
pub mod product;
pub mod types;

pub use address::{Address, AddressError, AddressKind};
pub use cart::{Cart, CartError, CartItem};
pub use product::Product;
pub use types::*;
