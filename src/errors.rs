//! Error types for ctxpick.

use std::path::PathBuf;

use crate::output::OutputError;
use crate::walker::WalkError;

/// Top-level error type for ctxpick operations.
#[derive(Debug, thiserror::Error)]
pub enum CtxpickError {
    #[error("invalid path: {0}")]
    InvalidRoot(PathBuf),

    #[error("no matching files found in {0}")]
    NoFilesFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

impl From<WalkError> for CtxpickError {
    fn from(error: WalkError) -> Self {
        match error {
            WalkError::NotFound { path } | WalkError::NotADirectory { path } => {
                CtxpickError::InvalidRoot(path)
            }
        }
    }
}

/// Map an error to its exit code.
pub fn exit_code(error: &CtxpickError) -> i32 {
    match error {
        CtxpickError::InvalidRoot(_) => 3,
        CtxpickError::NoFilesFound(_) => 5,
        CtxpickError::Io(_) => 1,
        CtxpickError::Output(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_errors_become_invalid_root() {
        let err: CtxpickError = WalkError::NotFound {
            path: PathBuf::from("/missing"),
        }
        .into();
        assert!(matches!(err, CtxpickError::InvalidRoot(_)));
        assert_eq!(exit_code(&err), 3);
        assert_eq!(err.to_string(), "invalid path: /missing");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&CtxpickError::NoFilesFound(PathBuf::from("."))), 5);
        let io = std::io::Error::other("boom");
        assert_eq!(exit_code(&CtxpickError::Io(io)), 1);
    }
}
