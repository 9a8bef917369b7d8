use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum NeedlexError {
    #[error("Source already registered: {0}")]
    DuplicateSource(String),

    #[error("Refusing to register empty source: {0}")]
    EmptySource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in source stream at byte offset {offset}")]
    InvalidUtf8 { offset: u64 },

    #[error("Source content is too large to be held as a string: {0}")]
    NotLoadable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, NeedlexError>;

impl NeedlexError {
    /// Check if this error was caused by invalid caller input rather than
    /// an underlying read failure
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            NeedlexError::DuplicateSource(_) | NeedlexError::EmptySource(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NeedlexError::DuplicateSource("notes".to_string());
        assert_eq!(err.to_string(), "Source already registered: notes");

        let err = NeedlexError::InvalidUtf8 { offset: 17 };
        assert_eq!(
            err.to_string(),
            "Invalid UTF-8 in source stream at byte offset 17"
        );
    }

    #[test]
    fn test_caller_errors() {
        assert!(NeedlexError::DuplicateSource("a".to_string()).is_caller_error());
        assert!(NeedlexError::EmptySource("a".to_string()).is_caller_error());
        assert!(!NeedlexError::Internal("boom".to_string()).is_caller_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: NeedlexError = io.into();
        assert!(matches!(err, NeedlexError::Io(_)));
    }
}
