//! Error types for parameter-set file operations.

use std::fmt;
use std::path::PathBuf;

use psf_xml::XmlError;
use thiserror::Error;

/// Errors that can occur when reading or writing parameter-set files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParamSetError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not well-formed XML.
    #[error("{0}")]
    Xml(#[from] XmlError),

    /// The root element does not identify a parameter-set file.
    #[error("unexpected root element <{found}>, expected <{expected}>")]
    WrongRootTag {
        found: String,
        expected: &'static str,
    },

    /// Checksum verification was requested but the file carries none.
    #[error("{path}: file has no checksum")]
    MissingChecksum { path: PathBuf },

    /// Stored checksum does not match the file content.
    #[error("{path}: checksum mismatch (stored {}, computed 0x{computed:04X})", display_checksum(.stored))]
    ChecksumMismatch {
        path: PathBuf,
        stored: Option<u16>,
        computed: u16,
    },

    /// Structural or semantic schema violation.
    #[error("invalid content at {location}: {message}")]
    ConfigInvalid { location: String, message: String },

    /// A node with this name is already registered.
    #[error("duplicate node name: {name}")]
    DuplicateName { name: String },

    /// Refusing to overwrite an existing file.
    #[error("file already exists: {path}")]
    AlreadyExists { path: PathBuf },
}

/// Result type alias for parameter-set operations.
pub type Result<T> = std::result::Result<T, ParamSetError>;

/// Coarse error classification reported to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    ChecksumMismatch,
    MissingChecksum,
    ConfigInvalid,
    DuplicateName,
    AlreadyExists,
}

impl ErrorKind {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Io => "I/O error",
            Self::ChecksumMismatch => "checksum mismatch",
            Self::MissingChecksum => "missing checksum",
            Self::ConfigInvalid => "invalid content",
            Self::DuplicateName => "duplicate name",
            Self::AlreadyExists => "already exists",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ParamSetError {
    /// Create a ConfigInvalid error for a document location.
    pub fn invalid(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create an Io error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::Io { .. }
            | Self::Xml(_)
            | Self::WrongRootTag { .. } => ErrorKind::Io,
            Self::MissingChecksum { .. } => ErrorKind::MissingChecksum,
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Self::ConfigInvalid { .. } => ErrorKind::ConfigInvalid,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
        }
    }
}

fn display_checksum(stored: &Option<u16>) -> String {
    match stored {
        Some(value) => format!("0x{value:04X}"),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParamSetError::invalid("/nodes/node[2]/raw", "size mismatch");
        assert_eq!(
            format!("{err}"),
            "invalid content at /nodes/node[2]/raw: size mismatch"
        );

        let err = ParamSetError::ChecksumMismatch {
            path: PathBuf::from("a.syde_psi"),
            stored: Some(0x1234),
            computed: 0xABCD,
        };
        assert_eq!(
            format!("{err}"),
            "a.syde_psi: checksum mismatch (stored 0x1234, computed 0xABCD)"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ParamSetError::FileNotFound {
                path: PathBuf::from("x")
            }
            .kind(),
            ErrorKind::Io
        );
        assert_eq!(
            ParamSetError::WrongRootTag {
                found: "other".to_string(),
                expected: "root",
            }
            .kind(),
            ErrorKind::Io
        );
        assert_eq!(
            ParamSetError::DuplicateName {
                name: "NodeA".to_string()
            }
            .kind(),
            ErrorKind::DuplicateName
        );
        assert_eq!(
            ParamSetError::from(XmlError::NoRoot).kind(),
            ErrorKind::Io
        );
    }
}
