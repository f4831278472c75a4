use crate::core::error::CoreError;
use crate::format::error::FormatError;
use rust_i18n::t;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Format(FormatError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Core(err) => write!(f, "{}", t!("error.edit_failed", err = err.to_string())),
            AppError::Format(err) => write!(f, "{}", t!("error.format_error", err = err.to_string())),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Core(err) => Some(err),
            AppError::Format(err) => Some(err),
        }
    }
}

impl From<CoreError> for AppError { fn from(err: CoreError) -> Self { AppError::Core(err) } }
impl From<FormatError> for AppError { fn from(err: FormatError) -> Self { AppError::Format(err) } }

pub type Result<T> = std::result::Result<T, AppError>;
