//! Result type alias for rdom operations

use crate::error::DomError;

/// Standard Result type for rdom operations
pub type Result<T> = std::result::Result<T, DomError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Convert a recoverable error to `Ok(None)`, keeping it in `skipped`;
    /// other errors pass through
    fn recoverable(self, skipped: &mut Vec<DomError>) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self, skipped: &mut Vec<DomError>) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Skipping: {}", err);
                skipped.push(err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
