pub mod reconcile;
pub mod records;
pub mod selection;
pub mod viewport;

pub use records::*;
