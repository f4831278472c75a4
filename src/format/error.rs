use crate::core::error::CoreError;
use rust_i18n::t;
use std::io;

#[derive(Debug)]
pub enum FormatError {
    Io(io::Error),
    Json(serde_json::Error),
    NotFound { kind: &'static str, name: String },
    InvalidName { kind: &'static str, name: String },
    EmptySkeleton(String),
    EmptyAnimation(String),
    UnknownSkeleton { animation: String, skeleton: String },
    Core(CoreError),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Io(err) => write!(f, "{}", t!("error.io_error", err = err.to_string())),
            FormatError::Json(err) => write!(f, "{}", t!("error.json_error", err = err.to_string())),
            FormatError::NotFound { kind, name } => write!(f, "{}", t!("error.not_found", kind = kind, name = name)),
            FormatError::InvalidName { kind, name } => write!(f, "{}", t!("error.invalid_name", kind = kind, name = name)),
            FormatError::EmptySkeleton(name) => write!(f, "{}", t!("error.empty_skeleton", name = name)),
            FormatError::EmptyAnimation(name) => write!(f, "{}", t!("error.empty_animation", name = name)),
            FormatError::UnknownSkeleton { animation, skeleton } => write!(f, "{}", t!(
                "error.animation_unknown_skeleton",
                animation = animation,
                skeleton = skeleton
            )),
            FormatError::Core(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Io(err) => Some(err),
            FormatError::Json(err) => Some(err),
            FormatError::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self { FormatError::Io(err) }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self { FormatError::Json(err) }
}

impl From<CoreError> for FormatError {
    fn from(err: CoreError) -> Self { FormatError::Core(err) }
}

pub type Result<T> = std::result::Result<T, FormatError>;
