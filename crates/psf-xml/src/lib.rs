//! Checksum-protected XML documents.
//!
//! This crate provides the document layer of the parameter-set file format:
//!
//! - an arena-backed element tree addressed by [`NodeId`] handles
//! - parsing from and serializing to UTF-8 XML (via `quick-xml`)
//! - a whole-document CRC16 stored in a root attribute
//!
//! # Example
//!
//! ```
//! use psf_xml::{Document, checksum};
//!
//! let mut doc = Document::new("opensyde-parameter-sets");
//! let root = doc.root();
//! let version = doc.append_child(root, "file-version");
//! doc.set_text(version, "0x0001");
//!
//! let bytes = checksum::save(&mut doc).unwrap();
//! let loaded = checksum::load(&bytes).unwrap();
//! assert!(loaded.is_valid());
//! ```

pub mod checksum;
mod error;
mod parse;
mod tree;
mod write;

pub use checksum::{CHECKSUM_ATTRIBUTE, Loaded};
pub use error::{Result, XmlError};
pub use tree::{Attribute, Document, NodeId, parse_u32};
