//! Raw memory image of a node.
//!
//! ```xml
//! <raw>
//!   <raw-entry>
//!     <address>256</address>
//!     <value>1;2;3</value>
//!     <size>3</size>
//!   </raw-entry>
//! </raw>
//! ```

use psf_model::{RawEntry, RawNode};
use psf_xml::{Document, NodeId};
use tracing::debug;

use crate::base::{
    load_data_pool_infos, load_node_name, required_child, required_child_u32,
    save_data_pool_infos, save_node_name, set_child_text,
};
use crate::content::{DELIMITER, split_tokens};
use crate::error::{ParamSetError, Result};
use crate::missing::MissingContent;

pub const RAW_TAG: &str = "raw";
pub const RAW_ENTRY_TAG: &str = "raw-entry";
const ADDRESS_TAG: &str = "address";
const VALUE_TAG: &str = "value";
const SIZE_TAG: &str = "size";

/// Read the raw record of a `node` element.
pub fn load_raw_node(doc: &Document, node: NodeId, missing: &mut MissingContent) -> Result<RawNode> {
    let name = load_node_name(doc, node)?;
    let data_pools = load_data_pool_infos(doc, node, missing)?;
    let raw = required_child(doc, node, RAW_TAG)?;
    let entries = doc
        .children_named(raw, RAW_ENTRY_TAG)
        .map(|entry| load_raw_entry(doc, entry))
        .collect::<Result<Vec<_>>>()?;
    debug!(node = %name, entries = entries.len(), "loaded raw node");
    Ok(RawNode {
        name,
        data_pools,
        entries,
    })
}

fn load_raw_entry(doc: &Document, entry: NodeId) -> Result<RawEntry> {
    let start_address = required_child_u32(doc, entry, ADDRESS_TAG)?;
    let value = required_child(doc, entry, VALUE_TAG)?;
    let bytes = split_tokens(doc.text(value))
        .into_iter()
        .map(|token| {
            parse_byte(token).ok_or_else(|| {
                ParamSetError::invalid(doc.path(value), format!("\"{token}\" is not a byte value"))
            })
        })
        .collect::<Result<Vec<u8>>>()?;
    let declared = required_child_u32(doc, entry, SIZE_TAG)?;
    if usize::try_from(declared).ok() != Some(bytes.len()) {
        return Err(ParamSetError::invalid(
            doc.path(entry),
            format!(
                "declared size {declared} does not match {} byte values",
                bytes.len()
            ),
        ));
    }
    Ok(RawEntry {
        start_address,
        bytes,
    })
}

/// Decimal byte token, digits only.
fn parse_byte(token: &str) -> Option<u8> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Write the raw record into a `node` element.
///
/// An existing `raw` block is discarded and rebuilt from `raw_node`.
pub fn save_raw_node(doc: &mut Document, node: NodeId, raw_node: &RawNode) {
    save_node_name(doc, node, &raw_node.name);
    save_data_pool_infos(doc, node, &raw_node.data_pools);
    if let Some(existing) = doc.child(node, RAW_TAG) {
        doc.remove_child(node, existing);
    }
    let raw = doc.append_child(node, RAW_TAG);
    for entry in &raw_node.entries {
        let element = doc.append_child(raw, RAW_ENTRY_TAG);
        set_child_text(doc, element, ADDRESS_TAG, entry.start_address.to_string());
        let bytes: Vec<String> = entry.bytes.iter().map(u8::to_string).collect();
        set_child_text(doc, element, VALUE_TAG, bytes.join(DELIMITER));
        set_child_text(doc, element, SIZE_TAG, entry.bytes.len().to_string());
    }
}

#[cfg(test)]
mod tests {
    use psf_model::{DataPoolInfo, DataPoolVersion};

    use super::*;
    use crate::base::NODE_TAG;

    fn sample() -> RawNode {
        RawNode {
            name: "NodeA".to_string(),
            data_pools: vec![DataPoolInfo::new("DP0", 123, DataPoolVersion::new(1, 0, 0))],
            entries: vec![
                RawEntry::new(0x100, vec![1, 2, 3]),
                RawEntry::new(0, vec![]),
                RawEntry::new(u32::MAX, vec![255]),
            ],
        }
    }

    fn entry_document(address: &str, value: &str, size: &str) -> (Document, NodeId) {
        let mut doc = Document::new("nodes");
        let node = doc.append_child(doc.root(), NODE_TAG);
        save_node_name(&mut doc, node, "NodeA");
        let raw = doc.append_child(node, RAW_TAG);
        let entry = doc.append_child(raw, RAW_ENTRY_TAG);
        set_child_text(&mut doc, entry, ADDRESS_TAG, address);
        set_child_text(&mut doc, entry, VALUE_TAG, value);
        set_child_text(&mut doc, entry, SIZE_TAG, size);
        (doc, node)
    }

    #[test]
    fn test_round_trip() {
        let mut doc = Document::new("nodes");
        let node = doc.append_child(doc.root(), NODE_TAG);
        save_raw_node(&mut doc, node, &sample());
        let loaded = load_raw_node(&doc, node, &mut MissingContent::default()).expect("load");
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_save_replaces_existing_raw() {
        let mut doc = Document::new("nodes");
        let node = doc.append_child(doc.root(), NODE_TAG);
        save_raw_node(&mut doc, node, &sample());
        let mut smaller = sample();
        smaller.entries.truncate(1);
        save_raw_node(&mut doc, node, &smaller);
        assert_eq!(doc.children_named(node, RAW_TAG).count(), 1);
        let loaded = load_raw_node(&doc, node, &mut MissingContent::default()).expect("load");
        assert_eq!(loaded.entries.len(), 1);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let (doc, node) = entry_document("0x100", "1;2;3", "2");
        let err = load_raw_node(&doc, node, &mut MissingContent::default()).expect_err("size");
        assert!(matches!(err, ParamSetError::ConfigInvalid { .. }));
        assert!(err.to_string().contains("declared size 2"));
    }

    #[test]
    fn test_hex_address_accepted() {
        let (doc, node) = entry_document("0x100", "1;2;3", "3");
        let loaded = load_raw_node(&doc, node, &mut MissingContent::default()).expect("load");
        assert_eq!(loaded.entries[0].start_address, 0x100);
    }

    #[test]
    fn test_bad_tokens_are_rejected() {
        for value in ["1;x;3", "1;256;3", "1;;3", "1;+2;3", "1;-0;3"] {
            let (doc, node) = entry_document("1", value, "3");
            assert!(load_raw_node(&doc, node, &mut MissingContent::default()).is_err());
        }
        for address in ["addr", "+1", "0x+1"] {
            let (doc, node) = entry_document(address, "1", "1");
            assert!(load_raw_node(&doc, node, &mut MissingContent::default()).is_err());
        }
    }

    #[test]
    fn test_missing_raw_block() {
        let mut doc = Document::new("nodes");
        let node = doc.append_child(doc.root(), NODE_TAG);
        save_node_name(&mut doc, node, "NodeA");
        assert!(load_raw_node(&doc, node, &mut MissingContent::default()).is_err());
    }
}
