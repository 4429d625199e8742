//! Core types and trait definitions for the Leadbook lead tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The lead lifecycle, dashboard aggregation, and list filtering live here as
//! pure functions; every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod lead;
pub mod note;
pub mod status;
pub mod store;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
