use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use psf_filer::{ParamSetHandler, ReadOptions, ReadSummary, VerifyReport, WriteOptions};
use psf_model::FileInfo;

/// Tool name written into the file info of copies.
pub const TOOL_NAME: &str = "psf";

/// A file loaded by `psf show`.
#[derive(Debug, Serialize)]
pub struct ShowResult {
    pub path: PathBuf,
    pub summary: ReadSummary,
    pub registry: ParamSetHandler,
}

/// Outcome of `psf copy`.
#[derive(Debug)]
pub struct CopyResult {
    pub output: PathBuf,
    pub nodes: usize,
    pub checksum: u16,
}

pub fn run_verify(path: &Path) -> Result<VerifyReport> {
    ParamSetHandler::verify_file(path).with_context(|| format!("verify {}", path.display()))
}

pub fn run_update_checksum(path: &Path) -> Result<u16> {
    ParamSetHandler::update_checksum(path)
        .with_context(|| format!("update checksum of {}", path.display()))
}

pub fn run_show(path: &Path, options: ReadOptions) -> Result<ShowResult> {
    let mut registry = ParamSetHandler::new();
    let summary = registry
        .read_file(path, options)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(ShowResult {
        path: path.to_path_buf(),
        summary,
        registry,
    })
}

/// Copy `input` to a new `output` with restamped file info and a checksum.
pub fn run_copy(
    input: &Path,
    output: &Path,
    interpreted_only: bool,
    comment: Option<&str>,
) -> Result<CopyResult> {
    let span = info_span!("copy", input = %input.display(), output = %output.display());
    let _guard = span.enter();

    let mut registry = ParamSetHandler::new();
    registry
        .read_file(
            input,
            ReadOptions::default().with_interpreted_only(interpreted_only),
        )
        .with_context(|| format!("read {}", input.display()))?;

    let file_info = restamp(registry.file_info(), comment);
    registry.set_file_info(file_info);
    registry
        .create_clean_file(
            output,
            WriteOptions::default().with_interpreted_only(interpreted_only),
        )
        .with_context(|| format!("write {}", output.display()))?;
    let checksum = ParamSetHandler::update_checksum(output)
        .with_context(|| format!("update checksum of {}", output.display()))?;

    let nodes = registry.interpreted_nodes().len();
    info!(nodes, "copy complete");
    Ok(CopyResult {
        output: output.to_path_buf(),
        nodes,
        checksum,
    })
}

/// Fresh timestamp and tool identity; creator and project carry over.
fn restamp(previous: &FileInfo, comment: Option<&str>) -> FileInfo {
    let mut info = FileInfo::stamped(TOOL_NAME, env!("CARGO_PKG_VERSION"));
    info.creator.clone_from(&previous.creator);
    info.project_name.clone_from(&previous.project_name);
    info.project_version.clone_from(&previous.project_version);
    info.user_comment = comment
        .map(str::to_string)
        .or_else(|| previous.user_comment.clone());
    info
}
