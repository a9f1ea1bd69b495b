//! Page sequence store and placeholder resolution.

mod frontier;
mod store;

pub use frontier::*;
pub use store::*;
