//! Data model types

mod column;
mod field;
mod layout;
mod page;
mod resource;
mod row;
mod table;

pub use column::*;
pub use field::*;
pub use layout::*;
pub use page::*;
pub use resource::*;
pub use row::*;
pub use table::*;
