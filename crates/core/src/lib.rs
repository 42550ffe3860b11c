//! Recicla Contigo Core - Shared types library.
//!
//! This crate provides the types used across all Recicla Contigo components:
//! - `client` - REST client, local stores and the report workflow
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. Everything here can be exercised without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, points, coordinates, photos, reports and
//!   catalog entities
//! - [`filter`] - Client-side list filtering for education and incentives
//! - [`format`] - Date formatting for the `es-PE` locale

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod format;
pub mod types;

pub use types::*;
