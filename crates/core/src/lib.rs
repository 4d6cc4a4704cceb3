//! SkyBook Core - Shared types library.
//!
//! This crate provides common types used across the SkyBook components:
//! - `api` - Booking backend (HTTP surface, entity store, domain services)
//! - `integration-tests` - End-to-end tests against a running API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
