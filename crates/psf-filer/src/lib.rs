//! Reader and writer for checksum-protected parameter-set files.
//!
//! A parameter-set file stores NVM snapshots of one or more nodes, each both
//! as raw memory entries and as interpreted data pools. The file is XML with
//! a CRC16 over the whole document stored in the root element.
//!
//! # Example
//!
//! ```no_run
//! use psf_filer::{ParamSetHandler, ReadOptions, WriteOptions};
//!
//! let mut handler = ParamSetHandler::new();
//! let summary = handler.read_file("device.syde_psi", ReadOptions::default()).unwrap();
//! println!("{} nodes, checksum {:?}", handler.interpreted_nodes().len(), summary.checksum);
//!
//! handler
//!     .create_clean_file("copy.syde_psi", WriteOptions::default())
//!     .unwrap();
//! ParamSetHandler::update_checksum("copy.syde_psi").unwrap();
//! ```

pub mod base;
pub mod content;
mod error;
mod handler;
pub mod interpreted;
mod missing;
mod options;
pub mod raw;

pub use error::{ErrorKind, ParamSetError, Result};
pub use handler::{ParamSetHandler, ReadSummary, VerifyReport};
pub use missing::MissingContent;
pub use options::{ReadOptions, WriteOptions};
