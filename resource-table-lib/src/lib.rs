//! Resource table client library
//!
//! Keeps a paginated, server-sorted table of resources in sync with a
//! query-string address, and surfaces server-pushed notifications one modal
//! at a time.
//!
//! The address is the single source of truth: every layout change or edit is
//! written to it and the table is reloaded from what was written.

pub mod address;
pub mod api;
pub mod channel;
pub mod error;
pub mod model;
pub mod pages;
pub mod preferences;
pub mod query;

mod controller;

pub use controller::*;
