use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-part data pool version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DataPoolVersion {
    pub major: u8,
    pub minor: u8,
    pub release: u8,
}

impl DataPoolVersion {
    #[must_use]
    pub const fn new(major: u8, minor: u8, release: u8) -> Self {
        Self {
            major,
            minor,
            release,
        }
    }
}

impl fmt::Display for DataPoolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.release)
    }
}

/// Identity of a data pool inside a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoolInfo {
    pub name: String,
    /// CRC over the structural definition of the data pool.
    pub crc: u32,
    pub nvm_start_address: u32,
    pub nvm_size: u32,
    pub version: DataPoolVersion,
}

impl DataPoolInfo {
    pub fn new(name: impl Into<String>, crc: u32, version: DataPoolVersion) -> Self {
        Self {
            name: name.into(),
            crc,
            version,
            ..Self::default()
        }
    }

    /// Set the NVM range covered by the data pool.
    #[must_use]
    pub fn with_nvm(mut self, start_address: u32, size: u32) -> Self {
        self.nvm_start_address = start_address;
        self.nvm_size = size;
        self
    }
}
