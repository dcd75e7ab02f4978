#![forbid(unsafe_code)]

//! veil error model.
//!
//! Nothing on the per-frame path returns an error: missing data renders
//! nothing and stale messages are dropped. What remains are setup failures
//! (configuration) and programming errors caught at a cell boundary
//! (ownership).

use std::fmt;

use veil_core::cell::OwnershipError;
use veil_runtime::config::ConfigError;

/// Top-level error type for veil.
#[derive(Debug)]
pub enum Error {
    /// Loading or validating an [`OverlayConfig`](veil_runtime::OverlayConfig)
    /// failed.
    Config(ConfigError),
    /// A write hit a cell owned by another writer.
    Ownership(OwnershipError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Ownership(err) => write!(f, "ownership: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Ownership(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<OwnershipError> for Error {
    fn from(err: OwnershipError) -> Self {
        Self::Ownership(err)
    }
}

/// Standard result type for veil APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use veil_core::cell::AnimatedCell;

    #[test]
    fn ownership_error_converts_and_chains() {
        fn write(cell: &mut AnimatedCell) -> Result<()> {
            cell.set(0.5)?;
            Ok(())
        }
        let mut cell = AnimatedCell::new("opacity", 1.0);
        let err = write(&mut cell).unwrap_err();
        assert!(matches!(err, Error::Ownership(_)));
        assert!(err.to_string().starts_with("ownership: cell `opacity`"));
        assert!(err.source().is_some());
    }

    #[test]
    fn validation_error_converts() {
        let err: Error = ConfigError::Validation(vec!["drag.min_scale must be in [0, 1]".into()]).into();
        assert!(matches!(err, Error::Config(ConfigError::Validation(_))));
        assert!(err.to_string().contains("min_scale"));
    }
}
