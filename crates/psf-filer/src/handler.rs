//! Parameter-set file orchestrator.
//!
//! [`ParamSetHandler`] holds the registry of one open file (file info, raw
//! nodes and interpreted nodes) and drives the base, raw and interpreted
//! filers over a parsed [`Document`].

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use psf_model::{FileInfo, InterpretedNode, RawNode};
use psf_xml::checksum::{self, format_checksum, parse_checksum};
use psf_xml::{CHECKSUM_ATTRIBUTE, Document, XmlError};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::base::{
    NODE_TAG, NODES_TAG, ROOT_TAG, check_file_version, check_root_tag, load_file_info,
    required_child, save_file_info, save_file_version,
};
use crate::error::{ParamSetError, Result};
use crate::interpreted::{load_interpreted_node, save_interpreted_node};
use crate::missing::MissingContent;
use crate::options::{ReadOptions, WriteOptions};
use crate::raw::{load_raw_node, save_raw_node};

/// Outcome of a successful [`ParamSetHandler::read_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadSummary {
    /// Stored checksum, when present and parsable.
    pub checksum: Option<u16>,
    /// Optional content that was absent from the file.
    pub missing: MissingContent,
}

/// Checksum state of a file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub path: PathBuf,
    pub stored: Option<u16>,
    pub computed: u16,
}

impl VerifyReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.stored == Some(self.computed)
    }
}

/// Registry of one parameter-set file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParamSetHandler {
    file_info: FileInfo,
    raw_nodes: Vec<RawNode>,
    interpreted_nodes: Vec<InterpretedNode>,
}

impl ParamSetHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file into the registry, replacing its previous content.
    ///
    /// On error the registry is left empty.
    pub fn read_file(&mut self, path: impl AsRef<Path>, options: ReadOptions) -> Result<ReadSummary> {
        let path = path.as_ref();
        let _span = info_span!("read_file", path = %path.display()).entered();
        self.clear();
        let result = self.load(path, options);
        match &result {
            Ok(summary) => {
                if summary.missing.is_any() {
                    warn!(
                        count = summary.missing.len(),
                        "optional content missing from file"
                    );
                }
                info!(
                    raw_nodes = self.raw_nodes.len(),
                    interpreted_nodes = self.interpreted_nodes.len(),
                    "read parameter-set file"
                );
            }
            Err(_) => self.clear(),
        }
        result
    }

    fn load(&mut self, path: &Path, options: ReadOptions) -> Result<ReadSummary> {
        let bytes = read_bytes(path)?;
        let (doc, checksum) = if options.ignore_checksum {
            let doc = Document::from_bytes(&bytes)?;
            let stored = doc
                .attribute(doc.root(), CHECKSUM_ATTRIBUTE)
                .and_then(parse_checksum);
            let computed = checksum::compute(&doc);
            if stored != Some(computed) {
                warn!(
                    stored = ?stored,
                    computed = %format_checksum(computed),
                    "ignoring checksum mismatch"
                );
            }
            (doc, stored)
        } else {
            let loaded = checksum::load(&bytes).map_err(|err| match err {
                XmlError::MissingChecksum => ParamSetError::MissingChecksum {
                    path: path.to_path_buf(),
                },
                other => other.into(),
            })?;
            if !loaded.is_valid() {
                return Err(ParamSetError::ChecksumMismatch {
                    path: path.to_path_buf(),
                    stored: loaded.stored,
                    computed: loaded.computed,
                });
            }
            (loaded.document, loaded.stored)
        };

        check_root_tag(&doc)?;
        let root = doc.root();
        check_file_version(&doc, root)?;

        let mut missing = MissingContent::default();
        self.file_info = load_file_info(&doc, root, &mut missing);

        let nodes = required_child(&doc, root, NODES_TAG)?;
        for node in doc.children_named(nodes, NODE_TAG) {
            if !options.interpreted_only {
                self.add_raw_node(load_raw_node(&doc, node, &mut missing)?)?;
            }
            self.add_interpreted_node(load_interpreted_node(&doc, node, &mut missing)?)?;
        }
        self.check_consistency()?;

        Ok(ReadSummary { checksum, missing })
    }

    /// Write the registry to a new file without a checksum.
    ///
    /// Each interpreted node is written with the raw node of the same index
    /// unless `options.interpreted_only` is set.
    pub fn create_clean_file(&self, path: impl AsRef<Path>, options: WriteOptions) -> Result<()> {
        let path = path.as_ref();
        let _span = info_span!("create_clean_file", path = %path.display()).entered();
        if path.exists() {
            return Err(ParamSetError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        if !options.interpreted_only {
            if self.raw_nodes.len() != self.interpreted_nodes.len() {
                return Err(ParamSetError::invalid(
                    nodes_location(),
                    format!(
                        "{} raw nodes for {} interpreted nodes",
                        self.raw_nodes.len(),
                        self.interpreted_nodes.len()
                    ),
                ));
            }
            self.check_consistency()?;
        }

        let bytes = self.to_document(options).to_bytes()?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => ParamSetError::AlreadyExists {
                    path: path.to_path_buf(),
                },
                _ => ParamSetError::io(path, source),
            })?;
        file.write_all(&bytes)
            .map_err(|source| ParamSetError::io(path, source))?;

        info!(
            nodes = self.interpreted_nodes.len(),
            bytes = bytes.len(),
            "created parameter-set file"
        );
        Ok(())
    }

    /// Build the document written by [`create_clean_file`](Self::create_clean_file).
    #[must_use]
    pub fn to_document(&self, options: WriteOptions) -> Document {
        let mut doc = Document::new(ROOT_TAG);
        let root = doc.root();
        save_file_version(&mut doc, root);
        save_file_info(&mut doc, root, &self.file_info);
        let nodes = doc.append_child(root, NODES_TAG);
        for (index, interpreted) in self.interpreted_nodes.iter().enumerate() {
            let node = doc.append_child(nodes, NODE_TAG);
            save_interpreted_node(&mut doc, node, interpreted);
            if options.interpreted_only {
                continue;
            }
            if let Some(raw) = self.raw_nodes.get(index) {
                save_raw_node(&mut doc, node, raw);
            }
        }
        doc
    }

    /// Recompute and store the checksum of an existing file.
    ///
    /// The old checksum is not verified.
    pub fn update_checksum(path: impl AsRef<Path>) -> Result<u16> {
        let path = path.as_ref();
        let _span = info_span!("update_checksum", path = %path.display()).entered();
        let mut doc = Document::from_bytes(&read_bytes(path)?)?;
        check_root_tag(&doc)?;
        let value = checksum::update(&mut doc);
        let bytes = doc.to_bytes()?;
        fs::write(path, bytes).map_err(|source| ParamSetError::io(path, source))?;
        info!(checksum = %format_checksum(value), "checksum updated");
        Ok(value)
    }

    /// Report the stored and computed checksum of a file.
    pub fn verify_file(path: impl AsRef<Path>) -> Result<VerifyReport> {
        let path = path.as_ref();
        let _span = info_span!("verify_file", path = %path.display()).entered();
        let doc = Document::from_bytes(&read_bytes(path)?)?;
        check_root_tag(&doc)?;
        let report = VerifyReport {
            path: path.to_path_buf(),
            stored: doc
                .attribute(doc.root(), CHECKSUM_ATTRIBUTE)
                .and_then(parse_checksum),
            computed: checksum::compute(&doc),
        };
        debug!(
            stored = ?report.stored,
            computed = %format_checksum(report.computed),
            valid = report.is_valid(),
            "verified checksum"
        );
        Ok(report)
    }

    /// Register a raw node; fails if one with the same name exists.
    pub fn add_raw_node(&mut self, node: RawNode) -> Result<()> {
        if self.raw_node(&node.name).is_some() {
            return Err(ParamSetError::DuplicateName { name: node.name });
        }
        self.raw_nodes.push(node);
        Ok(())
    }

    /// Register an interpreted node; fails if one with the same name exists.
    pub fn add_interpreted_node(&mut self, node: InterpretedNode) -> Result<()> {
        if self.interpreted_node(&node.name).is_some() {
            return Err(ParamSetError::DuplicateName { name: node.name });
        }
        self.interpreted_nodes.push(node);
        Ok(())
    }

    pub fn set_file_info(&mut self, file_info: FileInfo) {
        self.file_info = file_info;
    }

    #[must_use]
    pub fn file_info(&self) -> &FileInfo {
        &self.file_info
    }

    #[must_use]
    pub fn raw_nodes(&self) -> &[RawNode] {
        &self.raw_nodes
    }

    #[must_use]
    pub fn interpreted_nodes(&self) -> &[InterpretedNode] {
        &self.interpreted_nodes
    }

    #[must_use]
    pub fn raw_node(&self, name: &str) -> Option<&RawNode> {
        self.raw_nodes.iter().find(|node| node.name == name)
    }

    #[must_use]
    pub fn interpreted_node(&self, name: &str) -> Option<&InterpretedNode> {
        self.interpreted_nodes.iter().find(|node| node.name == name)
    }

    /// Reset file info and drop all nodes.
    pub fn clear(&mut self) {
        self.file_info = FileInfo::default();
        self.raw_nodes.clear();
        self.interpreted_nodes.clear();
    }

    /// True when no node is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_nodes.is_empty() && self.interpreted_nodes.is_empty()
    }

    /// Raw and interpreted node names must agree in order once both are set.
    fn check_consistency(&self) -> Result<()> {
        if self.raw_nodes.is_empty() || self.interpreted_nodes.is_empty() {
            return Ok(());
        }
        let raw: Vec<&str> = self.raw_nodes.iter().map(|n| n.name.as_str()).collect();
        let interpreted: Vec<&str> = self
            .interpreted_nodes
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        if raw == interpreted {
            Ok(())
        } else {
            Err(ParamSetError::invalid(
                nodes_location(),
                format!("raw nodes {raw:?} do not match interpreted nodes {interpreted:?}"),
            ))
        }
    }
}

fn nodes_location() -> String {
    format!("/{ROOT_TAG}/{NODES_TAG}")
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ParamSetError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ParamSetError::io(path, source),
    })
}
