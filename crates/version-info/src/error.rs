//! Error types for loading the version metadata resource.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type VersionResult<T> = Result<T, VersionError>;

/// Failures surfaced by [`crate::initialize`] and the accessors of the
/// process-wide state.
///
/// Both metadata variants are fatal: the hosting process should report the
/// message (it names the resource) and stop relying on version information.
#[derive(Debug, Error)]
pub enum VersionError {
    /// The resource could not be located, opened or read.
    #[error("unable to load {}: {source}", .path.display())]
    MetadataUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The resource was read but its content is unusable.
    #[error("malformed {}: {reason}", .path.display())]
    MetadataMalformed {
        path: PathBuf,
        #[source]
        reason: MalformedReason,
    },

    /// An accessor was used before a successful initialization.
    #[error("version information has not been initialized")]
    NotInitialized,
}

impl VersionError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, VersionError::MetadataUnavailable { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, VersionError::MetadataMalformed { .. })
    }
}

/// Why a metadata resource was rejected.
#[derive(Debug, Error)]
pub enum MalformedReason {
    #[error("required key '{0}' is missing")]
    MissingKey(&'static str),

    #[error("key '{key}' holds '{value}', expected an integer")]
    InvalidInteger {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("malformed \\uXXXX escape on line {line}")]
    InvalidEscape { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_resource() {
        let err = VersionError::MetadataUnavailable {
            path: PathBuf::from("/opt/jvpy/version.properties"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/opt/jvpy/version.properties"));
        assert!(err.is_unavailable());

        let err = VersionError::MetadataMalformed {
            path: PathBuf::from("version.properties"),
            reason: MalformedReason::MissingKey("jvm.python.version"),
        };
        let msg = err.to_string();
        assert!(msg.contains("version.properties"));
        assert!(msg.contains("jvm.python.version"));
        assert!(err.is_malformed());
    }
}
