//! CLI command handling

pub mod input;
pub mod output;
pub mod render;
pub mod serve;

pub use input::*;
pub use output::*;
pub use render::*;
pub use serve::*;
