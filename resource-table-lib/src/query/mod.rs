//! Query-state codec.
//!
//! The address (a flat string-keyed parameter map) is the only authoritative
//! store of table configuration. This module converts between that map and a
//! typed [`TableConfig`].

mod codec;
mod filter;
mod params;

pub use codec::*;
pub use filter::*;
pub use params::*;
