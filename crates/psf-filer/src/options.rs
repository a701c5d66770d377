//! Options for reading and writing parameter-set files.

use serde::{Deserialize, Serialize};

/// Options controlling [`ParamSetHandler::read_file`](crate::ParamSetHandler::read_file).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Accept files whose checksum is missing or does not match.
    pub ignore_checksum: bool,
    /// Skip the raw memory records of every node.
    pub interpreted_only: bool,
}

impl ReadOptions {
    #[must_use]
    pub fn with_ignore_checksum(mut self, ignore: bool) -> Self {
        self.ignore_checksum = ignore;
        self
    }

    #[must_use]
    pub fn with_interpreted_only(mut self, interpreted_only: bool) -> Self {
        self.interpreted_only = interpreted_only;
        self
    }
}

/// Options controlling [`ParamSetHandler::create_clean_file`](crate::ParamSetHandler::create_clean_file).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Write only the interpreted records.
    pub interpreted_only: bool,
}

impl WriteOptions {
    #[must_use]
    pub fn with_interpreted_only(mut self, interpreted_only: bool) -> Self {
        self.interpreted_only = interpreted_only;
        self
    }
}
