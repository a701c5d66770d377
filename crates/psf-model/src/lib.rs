//! Data model of parameter-set files.
//!
//! A parameter-set file is a snapshot of the NVM of one or more nodes
//! (controllers). Each node is kept twice: as raw memory entries keyed by
//! address and as an interpreted hierarchy of data pools, lists and typed
//! elements.

pub mod content;
pub mod datapool;
pub mod file_info;
pub mod interpreted;
pub mod raw;

pub use content::{ContentType, ContentValues, NotScalar, TypedContent, UnknownContentType};
pub use datapool::{DataPoolInfo, DataPoolVersion};
pub use file_info::FileInfo;
pub use interpreted::{InterpretedDataPool, InterpretedElement, InterpretedList, InterpretedNode};
pub use raw::{RawEntry, RawNode};
