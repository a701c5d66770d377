//! Error types for document parsing and checksum verification.

use thiserror::Error;

/// Errors that can occur when reading or writing a checksummed document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Malformed XML syntax.
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// Malformed attribute in a start tag.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Invalid character or entity reference.
    #[error("invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Tag names, attribute names or text that are not valid UTF-8.
    #[error("invalid encoding: {message}")]
    Encoding { message: String },

    /// The document contains no element at all.
    #[error("document has no root element")]
    NoRoot,

    /// More than one top-level element.
    #[error("document has more than one root element (found <{name}>)")]
    MultipleRoots { name: String },

    /// End of input reached with open elements.
    #[error("unexpected end of document inside <{name}>")]
    UnclosedElement { name: String },

    /// Root element carries no checksum attribute.
    #[error("document root has no checksum attribute")]
    MissingChecksum,

    /// Stored checksum does not match the document content.
    #[error("checksum mismatch: stored {}, computed 0x{computed:04X}", format_stored(.stored))]
    ChecksumMismatch { stored: Option<u16>, computed: u16 },

    /// I/O error while serializing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, XmlError>;

impl XmlError {
    /// Create an Encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}

fn format_stored(stored: &Option<u16>) -> String {
    match stored {
        Some(value) => format!("0x{value:04X}"),
        None => "<unparsable>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_display() {
        let err = XmlError::ChecksumMismatch {
            stored: Some(0x12),
            computed: 0xABCD,
        };
        assert_eq!(
            format!("{err}"),
            "checksum mismatch: stored 0x0012, computed 0xABCD"
        );

        let err = XmlError::ChecksumMismatch {
            stored: None,
            computed: 1,
        };
        assert!(format!("{err}").contains("<unparsable>"));
    }
}
