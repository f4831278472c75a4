pub mod error;
pub mod project_dir;

pub use error::{FormatError, Result};
pub use project_dir::ProjectDir;
