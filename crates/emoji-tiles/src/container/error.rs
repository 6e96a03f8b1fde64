//! Error types for container decoding
//!
//! [`FormatError`] covers every way a container can be malformed.
//! [`ContainerError`] adds the one failure that is about size rather than
//! shape: a payload shorter than its declared shape.

use std::fmt;

/// A malformed array container.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The first six bytes are not `\x93NUMPY`
    BadMagic,
    /// Major version is not 1, 2 or 3
    UnsupportedVersion {
        /// Major version byte
        major: u8,
        /// Minor version byte
        minor: u8,
    },
    /// The fixed preamble or the metadata block runs past the end of the buffer
    HeaderOutOfBounds {
        /// Bytes needed to read the full header
        needed: usize,
        /// Bytes available
        available: usize,
    },
    /// The metadata block is not valid ASCII dictionary text
    InvalidMetadata {
        /// Byte offset within the metadata text
        position: usize,
        /// What went wrong
        reason: String,
    },
    /// A required metadata key is absent
    MissingKey(&'static str),
    /// A metadata key appears twice
    DuplicateKey(String),
    /// A required metadata key has the wrong value type
    WrongValueType {
        /// Key name
        key: &'static str,
        /// Expected value type
        expected: &'static str,
    },
    /// `fortran_order` is `True`
    ColumnMajor,
    /// dtype descriptor is neither unsigned 8-bit nor little-endian float32
    UnsupportedDtype(String),
    /// Shape does not have exactly four dimensions
    ShapeRank(usize),
    /// Shape is not `(count, edge, edge, 4)`
    ShapeMismatch {
        /// Shape found in the container
        shape: Vec<usize>,
        /// Configured tile edge
        edge: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::BadMagic => write!(f, "bad magic (expected \\x93NUMPY)"),
            FormatError::UnsupportedVersion { major, minor } => {
                write!(f, "unsupported container version {}.{}", major, minor)
            }
            FormatError::HeaderOutOfBounds { needed, available } => write!(
                f,
                "header needs {} bytes but only {} are available",
                needed, available
            ),
            FormatError::InvalidMetadata { position, reason } => {
                write!(f, "invalid metadata at byte {}: {}", position, reason)
            }
            FormatError::MissingKey(key) => write!(f, "metadata missing '{}'", key),
            FormatError::DuplicateKey(key) => write!(f, "metadata repeats '{}'", key),
            FormatError::WrongValueType { key, expected } => {
                write!(f, "metadata '{}' must be {}", key, expected)
            }
            FormatError::ColumnMajor => write!(f, "column-major (fortran_order) arrays are not supported"),
            FormatError::UnsupportedDtype(descr) => write!(
                f,
                "unsupported dtype '{}' (expected uint8 or little-endian float32)",
                descr
            ),
            FormatError::ShapeRank(rank) => {
                write!(f, "expected a 4-dimensional shape, got {} dimensions", rank)
            }
            FormatError::ShapeMismatch { shape, edge } => {
                let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
                write!(
                    f,
                    "unexpected shape ({}), expected (N, {}, {}, 4)",
                    dims.join(", "),
                    edge,
                    edge
                )
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Error type for decoding a container into tiles.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerError {
    /// Malformed container
    Format(FormatError),
    /// Payload shorter than the shape implies
    Truncated {
        /// Payload bytes the shape requires
        expected: usize,
        /// Payload bytes present
        available: usize,
    },
}

impl From<FormatError> for ContainerError {
    fn from(err: FormatError) -> Self {
        ContainerError::Format(err)
    }
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::Format(err) => write!(f, "format error: {}", err),
            ContainerError::Truncated {
                expected,
                available,
            } => write!(
                f,
                "truncated payload: shape requires {} bytes, found {}",
                expected, available
            ),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Format(err) => Some(err),
            ContainerError::Truncated { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = FormatError::ShapeMismatch {
            shape: vec![3, 8, 8, 4],
            edge: 16,
        };
        assert_eq!(
            err.to_string(),
            "unexpected shape (3, 8, 8, 4), expected (N, 16, 16, 4)"
        );
    }

    #[test]
    fn test_container_error_wraps_format() {
        let err: ContainerError = FormatError::BadMagic.into();
        assert!(matches!(err, ContainerError::Format(FormatError::BadMagic)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_truncated_message() {
        let err = ContainerError::Truncated {
            expected: 1024,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "truncated payload: shape requires 1024 bytes, found 10"
        );
    }
}
