pub mod feature_collection;
pub mod hotspots;
pub mod loader;
pub mod regions;

pub use feature_collection::*;
pub use hotspots::*;
pub use loader::*;
pub use regions::*;
