pub mod animation;
pub mod color;
pub mod error;
pub mod patch;
pub mod project;
pub mod settings;
pub mod view;

pub use error::{CoreError, Result};
