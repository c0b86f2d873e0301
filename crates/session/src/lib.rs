pub mod config;
pub mod explorer;
pub mod story;

pub use config::{ConfigError, ExplorerConfig};
pub use explorer::*;
pub use story::{Presentation, StoryStep};
