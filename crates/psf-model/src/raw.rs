use serde::{Deserialize, Serialize};

use crate::datapool::DataPoolInfo;

/// Byte-exact snapshot of one NVM address range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub start_address: u32,
    pub bytes: Vec<u8>,
}

impl RawEntry {
    pub fn new(start_address: u32, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            start_address,
            bytes: bytes.into(),
        }
    }
}

/// Raw memory image of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    pub data_pools: Vec<DataPoolInfo>,
    pub entries: Vec<RawEntry>,
}

impl RawNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Total number of bytes over all entries.
    #[must_use]
    pub fn byte_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.bytes.len()).sum()
    }
}
