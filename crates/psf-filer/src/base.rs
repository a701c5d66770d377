//! Shared schema fragments: file version, file info, node name and the
//! data pool identity list.
//!
//! Every routine takes the handle of the element it works on. None of them
//! keeps any position in the document, so the caller's handles are still
//! valid and unchanged after success or failure.

use psf_model::{DataPoolInfo, DataPoolVersion, FileInfo};
use psf_xml::{Document, NodeId, parse_u32};

use crate::error::{ParamSetError, Result};
use crate::missing::MissingContent;

/// Root tag of a parameter-set file.
pub const ROOT_TAG: &str = "opensyde-parameter-sets";

/// The only file version this crate reads and writes.
pub const FILE_VERSION: u16 = 1;

pub const FILE_VERSION_TAG: &str = "file-version";
pub const FILE_INFO_TAG: &str = "file-info";
pub const NODES_TAG: &str = "nodes";
pub const NODE_TAG: &str = "node";
pub const NAME_TAG: &str = "name";
pub const DATAPOOLS_TAG: &str = "datapools";
pub const DATAPOOL_TAG: &str = "datapool";
pub const VERSION_TAG: &str = "version";

const DATE_TIME_TAG: &str = "datetime";
const CREATOR_TAG: &str = "creator";
const TOOL_NAME_TAG: &str = "tool-name";
const TOOL_VERSION_TAG: &str = "tool-version";
const PROJECT_NAME_TAG: &str = "project-name";
const PROJECT_VERSION_TAG: &str = "project-version";
const USER_COMMENT_TAG: &str = "user-comment";

const CRC_ATTRIBUTE: &str = "crc";
const NVM_START_ADDRESS_ATTRIBUTE: &str = "nvm-start-address";
const NVM_SIZE_ATTRIBUTE: &str = "nvm-size";
const MAJOR_ATTRIBUTE: &str = "major";
const MINOR_ATTRIBUTE: &str = "minor";
const RELEASE_ATTRIBUTE: &str = "release";

/// Fail unless the root's tag identifies a parameter-set file.
pub fn check_root_tag(doc: &Document) -> Result<()> {
    let found = doc.name(doc.root());
    if found == ROOT_TAG {
        Ok(())
    } else {
        Err(ParamSetError::WrongRootTag {
            found: found.to_string(),
            expected: ROOT_TAG,
        })
    }
}

/// Require a `file-version` child holding the supported version.
pub fn check_file_version(doc: &Document, parent: NodeId) -> Result<()> {
    let node = required_child(doc, parent, FILE_VERSION_TAG)?;
    let text = doc.text(node);
    let version = parse_u32(text).ok_or_else(|| {
        ParamSetError::invalid(doc.path(node), format!("file version \"{text}\" is not a number"))
    })?;
    if version == u32::from(FILE_VERSION) {
        Ok(())
    } else {
        Err(ParamSetError::invalid(
            doc.path(node),
            format!("unsupported file version {version}, expected {FILE_VERSION}"),
        ))
    }
}

/// Create or overwrite the `file-version` child.
pub fn save_file_version(doc: &mut Document, parent: NodeId) {
    set_child_text(doc, parent, FILE_VERSION_TAG, format!("0x{FILE_VERSION:04X}"));
}

/// Read the `file-info` block; absent fields are recorded in `missing`.
pub fn load_file_info(doc: &Document, parent: NodeId, missing: &mut MissingContent) -> FileInfo {
    let mut info = FileInfo::default();
    let Some(node) = doc.child(parent, FILE_INFO_TAG) else {
        missing.record(format!("{}/{FILE_INFO_TAG}", doc.path(parent)));
        return info;
    };
    for (tag, slot) in file_info_slots(&mut info) {
        match doc.child_text(node, tag) {
            Some(text) => *slot = Some(text.to_string()),
            None => missing.record(format!("{}/{tag}", doc.path(node))),
        }
    }
    info
}

/// Write the present fields of `info` below a `file-info` child.
pub fn save_file_info(doc: &mut Document, parent: NodeId, info: &FileInfo) {
    let node = doc.child_or_append(parent, FILE_INFO_TAG);
    let fields = [
        (DATE_TIME_TAG, &info.date_time),
        (CREATOR_TAG, &info.creator),
        (TOOL_NAME_TAG, &info.tool_name),
        (TOOL_VERSION_TAG, &info.tool_version),
        (PROJECT_NAME_TAG, &info.project_name),
        (PROJECT_VERSION_TAG, &info.project_version),
        (USER_COMMENT_TAG, &info.user_comment),
    ];
    for (tag, value) in fields {
        if let Some(value) = value {
            set_child_text(doc, node, tag, value.as_str());
        }
    }
}

fn file_info_slots(info: &mut FileInfo) -> [(&'static str, &mut Option<String>); 7] {
    [
        (DATE_TIME_TAG, &mut info.date_time),
        (CREATOR_TAG, &mut info.creator),
        (TOOL_NAME_TAG, &mut info.tool_name),
        (TOOL_VERSION_TAG, &mut info.tool_version),
        (PROJECT_NAME_TAG, &mut info.project_name),
        (PROJECT_VERSION_TAG, &mut info.project_version),
        (USER_COMMENT_TAG, &mut info.user_comment),
    ]
}

/// Read the mandatory `name` child of a node.
pub fn load_node_name(doc: &Document, node: NodeId) -> Result<String> {
    let name = required_child(doc, node, NAME_TAG)?;
    Ok(doc.text(name).to_string())
}

/// Create or overwrite the `name` child of a node.
pub fn save_node_name(doc: &mut Document, node: NodeId, name: &str) {
    set_child_text(doc, node, NAME_TAG, name);
}

/// Read the `datapools` block of a node. A node without one has no data pools.
pub fn load_data_pool_infos(
    doc: &Document,
    node: NodeId,
    missing: &mut MissingContent,
) -> Result<Vec<DataPoolInfo>> {
    let Some(list) = doc.child(node, DATAPOOLS_TAG) else {
        return Ok(Vec::new());
    };
    doc.children_named(list, DATAPOOL_TAG)
        .map(|data_pool| load_data_pool_info(doc, data_pool, missing))
        .collect()
}

fn load_data_pool_info(
    doc: &Document,
    node: NodeId,
    missing: &mut MissingContent,
) -> Result<DataPoolInfo> {
    let crc = required_attribute_u32(doc, node, CRC_ATTRIBUTE)?;
    let nvm_start_address = optional_attribute_u32(doc, node, NVM_START_ADDRESS_ATTRIBUTE, missing)?;
    let nvm_size = optional_attribute_u32(doc, node, NVM_SIZE_ATTRIBUTE, missing)?;
    let name = required_child(doc, node, NAME_TAG)?;
    let version = required_child(doc, node, VERSION_TAG)?;
    Ok(DataPoolInfo {
        name: doc.text(name).to_string(),
        crc,
        nvm_start_address,
        nvm_size,
        version: DataPoolVersion {
            major: required_attribute_u8(doc, version, MAJOR_ATTRIBUTE)?,
            minor: required_attribute_u8(doc, version, MINOR_ATTRIBUTE)?,
            release: required_attribute_u8(doc, version, RELEASE_ATTRIBUTE)?,
        },
    })
}

/// Write the `datapools` block unless the node already has one.
pub fn save_data_pool_infos<'a>(
    doc: &mut Document,
    node: NodeId,
    infos: impl IntoIterator<Item = &'a DataPoolInfo>,
) {
    if doc.child(node, DATAPOOLS_TAG).is_some() {
        return;
    }
    let list = doc.append_child(node, DATAPOOLS_TAG);
    for info in infos {
        let data_pool = doc.append_child(list, DATAPOOL_TAG);
        doc.set_attribute_u32(data_pool, CRC_ATTRIBUTE, info.crc);
        doc.set_attribute_u32(data_pool, NVM_START_ADDRESS_ATTRIBUTE, info.nvm_start_address);
        doc.set_attribute_u32(data_pool, NVM_SIZE_ATTRIBUTE, info.nvm_size);
        set_child_text(doc, data_pool, NAME_TAG, info.name.as_str());
        let version = doc.append_child(data_pool, VERSION_TAG);
        doc.set_attribute_u32(version, MAJOR_ATTRIBUTE, info.version.major.into());
        doc.set_attribute_u32(version, MINOR_ATTRIBUTE, info.version.minor.into());
        doc.set_attribute_u32(version, RELEASE_ATTRIBUTE, info.version.release.into());
    }
}

/// First child with the given tag or a ConfigInvalid naming the parent.
pub(crate) fn required_child(doc: &Document, parent: NodeId, tag: &str) -> Result<NodeId> {
    doc.child(parent, tag).ok_or_else(|| {
        ParamSetError::invalid(doc.path(parent), format!("missing element <{tag}>"))
    })
}

/// Integer text of a mandatory child.
pub(crate) fn required_child_u32(doc: &Document, parent: NodeId, tag: &str) -> Result<u32> {
    let node = required_child(doc, parent, tag)?;
    let text = doc.text(node);
    parse_u32(text).ok_or_else(|| {
        ParamSetError::invalid(doc.path(node), format!("\"{text}\" is not an unsigned integer"))
    })
}

fn required_attribute_u32(doc: &Document, node: NodeId, name: &str) -> Result<u32> {
    match doc.attribute_u32(node, name) {
        Some(Some(value)) => Ok(value),
        Some(None) => Err(not_a_number(doc, node, name)),
        None => Err(ParamSetError::invalid(
            doc.path(node),
            format!("missing attribute \"{name}\""),
        )),
    }
}

fn required_attribute_u8(doc: &Document, node: NodeId, name: &str) -> Result<u8> {
    let value = required_attribute_u32(doc, node, name)?;
    u8::try_from(value).map_err(|_| {
        ParamSetError::invalid(
            doc.path(node),
            format!("attribute \"{name}\" value {value} does not fit 8 bits"),
        )
    })
}

fn optional_attribute_u32(
    doc: &Document,
    node: NodeId,
    name: &str,
    missing: &mut MissingContent,
) -> Result<u32> {
    match doc.attribute_u32(node, name) {
        Some(Some(value)) => Ok(value),
        Some(None) => Err(not_a_number(doc, node, name)),
        None => {
            missing.record(format!("{}@{name}", doc.path(node)));
            Ok(0)
        }
    }
}

fn not_a_number(doc: &Document, node: NodeId, name: &str) -> ParamSetError {
    let value = doc.attribute(node, name).unwrap_or_default();
    ParamSetError::invalid(
        doc.path(node),
        format!("attribute \"{name}\" value \"{value}\" is not an unsigned integer"),
    )
}

/// Create or overwrite the text of the first child with the given tag.
pub(crate) fn set_child_text(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    text: impl Into<String>,
) -> NodeId {
    let node = doc.child_or_append(parent, tag);
    doc.set_text(node, text);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_document() -> Document {
        Document::new(ROOT_TAG)
    }

    #[test]
    fn test_file_version_round_trip() {
        let mut doc = root_document();
        let root = doc.root();
        save_file_version(&mut doc, root);
        save_file_version(&mut doc, root);
        assert_eq!(doc.children_named(root, FILE_VERSION_TAG).count(), 1);
        assert_eq!(doc.child_text(root, FILE_VERSION_TAG), Some("0x0001"));
        assert!(check_file_version(&doc, root).is_ok());
    }

    #[test]
    fn test_file_version_rejects_other_values() {
        for text in ["0x0002", "2", "abc", ""] {
            let mut doc = root_document();
            let root = doc.root();
            set_child_text(&mut doc, root, FILE_VERSION_TAG, text);
            assert!(matches!(
                check_file_version(&doc, root),
                Err(ParamSetError::ConfigInvalid { .. })
            ));
        }
        let doc = root_document();
        assert!(check_file_version(&doc, doc.root()).is_err());
    }

    #[test]
    fn test_file_info_partial() {
        let mut doc = root_document();
        let root = doc.root();
        let info = FileInfo {
            tool_name: Some("psf".to_string()),
            user_comment: Some("note".to_string()),
            ..FileInfo::default()
        };
        save_file_info(&mut doc, root, &info);

        let mut missing = MissingContent::default();
        let loaded = load_file_info(&doc, root, &mut missing);
        assert_eq!(loaded, info);
        assert_eq!(missing.len(), 5);
        assert!(
            missing
                .locations()
                .contains(&format!("/{ROOT_TAG}/file-info/creator"))
        );
    }

    #[test]
    fn test_file_info_absent() {
        let doc = root_document();
        let mut missing = MissingContent::default();
        let info = load_file_info(&doc, doc.root(), &mut missing);
        assert_eq!(info, FileInfo::default());
        assert!(missing.is_any());
    }

    #[test]
    fn test_node_name() {
        let mut doc = root_document();
        let node = doc.append_child(doc.root(), NODE_TAG);
        assert!(load_node_name(&doc, node).is_err());
        save_node_name(&mut doc, node, "NodeA");
        save_node_name(&mut doc, node, "NodeB");
        assert_eq!(doc.children_named(node, NAME_TAG).count(), 1);
        assert_eq!(load_node_name(&doc, node).expect("name"), "NodeB");
    }

    #[test]
    fn test_data_pool_infos_round_trip_and_guard() {
        let mut doc = root_document();
        let node = doc.append_child(doc.root(), NODE_TAG);
        let infos = vec![
            DataPoolInfo::new("DP0", 123, DataPoolVersion::new(1, 0, 0)).with_nvm(0x100, 32),
            DataPoolInfo::new("DP1", u32::MAX, DataPoolVersion::new(2, 3, 4)),
        ];
        save_data_pool_infos(&mut doc, node, &infos);
        save_data_pool_infos(&mut doc, node, &infos[..1]);
        assert_eq!(doc.children_named(node, DATAPOOLS_TAG).count(), 1);

        let mut missing = MissingContent::default();
        let loaded = load_data_pool_infos(&doc, node, &mut missing).expect("load");
        assert_eq!(loaded, infos);
        assert!(!missing.is_any());
    }

    fn data_pool_document(attributes: &[(&str, &str)], version: &[(&str, &str)]) -> Document {
        let mut doc = root_document();
        let node = doc.append_child(doc.root(), NODE_TAG);
        let list = doc.append_child(node, DATAPOOLS_TAG);
        let data_pool = doc.append_child(list, DATAPOOL_TAG);
        for (name, value) in attributes {
            doc.set_attribute(data_pool, name, *value);
        }
        set_child_text(&mut doc, data_pool, NAME_TAG, "DP0");
        let version_node = doc.append_child(data_pool, VERSION_TAG);
        for (name, value) in version {
            doc.set_attribute(version_node, name, *value);
        }
        doc
    }

    fn load_first(doc: &Document, missing: &mut MissingContent) -> Result<Vec<DataPoolInfo>> {
        let node = doc.child(doc.root(), NODE_TAG).expect("node");
        load_data_pool_infos(doc, node, missing)
    }

    const FULL_VERSION: [(&str, &str); 3] = [("major", "1"), ("minor", "0"), ("release", "0")];

    #[test]
    fn test_data_pool_optional_attributes() {
        let doc = data_pool_document(&[("crc", "123"), ("nvm-start-address", "16")], &FULL_VERSION);
        let mut missing = MissingContent::default();
        let infos = load_first(&doc, &mut missing).expect("load");
        assert_eq!(infos[0].nvm_size, 0);
        assert_eq!(infos[0].nvm_start_address, 16);
        assert_eq!(missing.len(), 1);
        assert!(missing.locations()[0].ends_with("@nvm-size"));
    }

    #[test]
    fn test_data_pool_requires_crc() {
        let doc = data_pool_document(&[("nvm-size", "1")], &FULL_VERSION);
        let err = load_first(&doc, &mut MissingContent::default()).expect_err("crc");
        assert!(err.to_string().contains("\"crc\""));

        let doc = data_pool_document(&[("crc", "x1")], &FULL_VERSION);
        assert!(load_first(&doc, &mut MissingContent::default()).is_err());
    }

    #[test]
    fn test_data_pool_requires_full_version() {
        for skipped in 0..3 {
            let version: Vec<(&str, &str)> = FULL_VERSION
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != skipped)
                .map(|(_, pair)| *pair)
                .collect();
            let doc = data_pool_document(&[("crc", "1")], &version);
            assert!(matches!(
                load_first(&doc, &mut MissingContent::default()),
                Err(ParamSetError::ConfigInvalid { .. })
            ));
        }
        let doc = data_pool_document(
            &[("crc", "1")],
            &[("major", "256"), ("minor", "0"), ("release", "0")],
        );
        assert!(load_first(&doc, &mut MissingContent::default()).is_err());
    }
}
