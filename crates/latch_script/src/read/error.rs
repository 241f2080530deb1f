use crate::error::EngineError;
use crate::read::Path;
use std::fmt;
use thiserror::Error;

/// Boxed error returned by [`CustomDecode`](crate::read::CustomDecode) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What went wrong while reading a value.
#[derive(Debug, Error)]
pub enum ReadErrorKind {
    #[error("max depth of {max_depth} exceeded")]
    DepthExceeded { max_depth: usize },

    #[error("value is not an object")]
    NotAnObject,

    #[error("value is not an array or object")]
    NotAnArrayOrObject,

    #[error("length {length} exceeds the limit of {max_length}")]
    LengthExceeded { length: usize, max_length: usize },

    #[error("{kind} not supported")]
    UnsupportedShape { kind: &'static str },

    #[error("custom decode failed: {0}")]
    CustomDecodeFailed(#[source] BoxError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A read failure together with the path of the value that caused it.
#[derive(Debug)]
pub struct ReadError {
    path: Path,
    kind: ReadErrorKind,
}

impl ReadError {
    pub fn new(path: Path, kind: impl Into<ReadErrorKind>) -> Self {
        Self {
            path,
            kind: kind.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> &ReadErrorKind {
        &self.kind
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "error reading value into {}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_errors_have_no_location() {
        let err = ReadError::new(Path::root(), ReadErrorKind::NotAnObject);
        assert_eq!(err.to_string(), "value is not an object");
    }

    #[test]
    fn nested_errors_name_the_path() {
        let path = Path::root().key("a").key("b").index(2);
        let err = ReadError::new(path, ReadErrorKind::NotAnObject);
        assert_eq!(
            err.to_string(),
            "error reading value into a.b[2]: value is not an object"
        );
    }

    #[test]
    fn unsupported_names_the_kind() {
        let err = ReadError::new(
            Path::root().key("callback"),
            ReadErrorKind::UnsupportedShape { kind: "function" },
        );
        assert_eq!(
            err.to_string(),
            "error reading value into callback: function not supported"
        );
    }
}
