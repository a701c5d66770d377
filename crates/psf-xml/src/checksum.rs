//! Whole-document CRC16 and the checksummed load/save entry points.
//!
//! The checksum covers tag names, attribute names and values, and text of
//! every element in depth-first pre-order. Before the children of an
//! element are visited, the current depth is folded in as two little-endian
//! bytes (1 for the children of the root). The root's own checksum
//! attribute is excluded. Text is folded the way [`Document::stored_text`]
//! returns it, so a saved document verifies after reloading.
//!
//! The depth counter is only folded for elements that have children; a
//! leaf adds nothing beyond its name, attributes and text. This rule is
//! pinned by `test_leaf_folds_no_depth` and still has to be confirmed
//! against a reference file from the existing tooling.
//!
//! The traversal keeps its own stack, so nesting depth is bounded by memory
//! rather than by the thread stack.

use crc::{CRC_16_SPI_FUJITSU, Crc};
use tracing::{debug, warn};

use crate::error::{Result, XmlError};
use crate::tree::{Document, NodeId};

/// Name of the root attribute holding the checksum.
pub const CHECKSUM_ATTRIBUTE: &str = "checksum";

/// Start value of the running checksum.
pub const CHECKSUM_SEED: u16 = 0x1D0F;

/// CRC-16/CCITT (poly 0x1021, unreflected, no final xor) seeded with 0x1D0F.
static CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_SPI_FUJITSU);

/// Fold bytes into a running CRC value.
#[must_use]
pub fn crc16_update(crc: u16, bytes: &[u8]) -> u16 {
    let mut digest = CRC16.digest_with_initial(crc);
    digest.update(bytes);
    digest.finalize()
}

/// Compute the checksum of a document as it would be stored.
#[must_use]
pub fn compute(doc: &Document) -> u16 {
    let root = doc.root();
    let mut crc = crc16_update(CHECKSUM_SEED, doc.name(root).as_bytes());
    for attribute in doc.attributes(root) {
        if attribute.name == CHECKSUM_ATTRIBUTE {
            continue;
        }
        crc = crc16_update(crc, attribute.name.as_bytes());
        crc = crc16_update(crc, attribute.value.as_bytes());
    }
    crc = crc16_update(crc, doc.stored_text(root).as_bytes());

    let mut pending: Vec<Pending<'_>> = Vec::new();
    crc = descend(doc, root, 1, crc, &mut pending);
    while let Some((children, depth)) = pending.last_mut() {
        let depth = *depth;
        match children.next() {
            Some(&child) => {
                crc = fold_element(doc, child, crc);
                crc = descend(doc, child, depth.wrapping_add(1), crc, &mut pending);
            }
            None => {
                pending.pop();
            }
        }
    }
    crc
}

/// Children still to visit and their depth.
type Pending<'a> = (std::slice::Iter<'a, NodeId>, u16);

fn descend<'a>(
    doc: &'a Document,
    parent: NodeId,
    depth: u16,
    crc: u16,
    pending: &mut Vec<Pending<'a>>,
) -> u16 {
    let children = doc.children(parent);
    if children.is_empty() {
        return crc;
    }
    pending.push((children.iter(), depth));
    crc16_update(crc, &depth.to_le_bytes())
}

fn fold_element(doc: &Document, id: NodeId, crc: u16) -> u16 {
    let mut crc = crc16_update(crc, doc.name(id).as_bytes());
    for attribute in doc.attributes(id) {
        crc = crc16_update(crc, attribute.name.as_bytes());
        crc = crc16_update(crc, attribute.value.as_bytes());
    }
    crc16_update(crc, doc.stored_text(id).as_bytes())
}

/// Format a checksum the way it is stored: `0x` and four hex digits.
#[must_use]
pub fn format_checksum(value: u16) -> String {
    format!("0x{value:04X}")
}

/// Parse a stored checksum; `None` when it is not a 16-bit hex literal.
#[must_use]
pub fn parse_checksum(text: &str) -> Option<u16> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.starts_with(['+', '-']) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// A parsed document together with its checksum state.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub document: Document,
    /// Value of the checksum attribute, `None` if it did not parse.
    pub stored: Option<u16>,
    /// Checksum computed over the parsed content.
    pub computed: u16,
}

impl Loaded {
    /// True when the stored checksum equals the computed one.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.stored == Some(self.computed)
    }

    /// Return the document if the checksum matches.
    pub fn verified(self) -> Result<Document> {
        if self.is_valid() {
            Ok(self.document)
        } else {
            Err(XmlError::ChecksumMismatch {
                stored: self.stored,
                computed: self.computed,
            })
        }
    }
}

/// Parse a document that must carry a checksum attribute on its root.
///
/// A mismatching checksum is not an error here; inspect
/// [`Loaded::is_valid`] or call [`Loaded::verified`].
pub fn load(bytes: &[u8]) -> Result<Loaded> {
    let document = Document::from_bytes(bytes)?;
    let stored = document
        .attribute(document.root(), CHECKSUM_ATTRIBUTE)
        .ok_or(XmlError::MissingChecksum)?;
    let stored = parse_checksum(stored);
    let computed = compute(&document);
    if stored == Some(computed) {
        debug!(checksum = %format_checksum(computed), "checksum verified");
    } else {
        warn!(
            stored = ?stored,
            computed = %format_checksum(computed),
            "checksum mismatch"
        );
    }
    Ok(Loaded {
        document,
        stored,
        computed,
    })
}

/// Write a fresh checksum into the root and serialize the document.
pub fn save(document: &mut Document) -> Result<Vec<u8>> {
    let checksum = update(document);
    debug!(checksum = %format_checksum(checksum), "checksum written");
    document.to_bytes()
}

/// Recompute the checksum and store it in the root attribute.
pub fn update(document: &mut Document) -> u16 {
    let checksum = compute(document);
    let root = document.root();
    document.set_attribute(root, CHECKSUM_ATTRIBUTE, format_checksum(checksum));
    checksum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16_update(CHECKSUM_SEED, b"123456789"), 0xE5CC);
        assert_eq!(crc16_update(CHECKSUM_SEED, b""), CHECKSUM_SEED);
    }

    #[test]
    fn test_crc16_chaining() {
        let whole = crc16_update(CHECKSUM_SEED, b"123456789");
        let split = crc16_update(crc16_update(CHECKSUM_SEED, b"1234"), b"56789");
        assert_eq!(whole, split);
    }

    #[test]
    fn test_compute_excludes_root_checksum() {
        let mut doc = Document::new("root");
        let root = doc.root();
        doc.append_child(root, "child");
        let before = compute(&doc);
        doc.set_attribute(root, CHECKSUM_ATTRIBUTE, "0xFFFF");
        assert_eq!(compute(&doc), before);
    }

    #[test]
    fn test_compute_traversal() {
        let mut doc = Document::new("r");
        let root = doc.root();
        doc.set_attribute(root, "k", "v");
        let child = doc.append_child(root, "c");
        doc.set_text(child, "t");
        let grandchild = doc.append_child(child, "g");
        doc.set_attribute(grandchild, "a", "b");

        let mut expected = crc16_update(CHECKSUM_SEED, b"r");
        expected = crc16_update(expected, b"k");
        expected = crc16_update(expected, b"v");
        expected = crc16_update(expected, b"");
        expected = crc16_update(expected, &1u16.to_le_bytes());
        expected = crc16_update(expected, b"c");
        expected = crc16_update(expected, b"t");
        expected = crc16_update(expected, &2u16.to_le_bytes());
        expected = crc16_update(expected, b"g");
        expected = crc16_update(expected, b"a");
        expected = crc16_update(expected, b"b");
        assert_eq!(compute(&doc), expected);
    }

    #[test]
    fn test_leaf_folds_no_depth() {
        let mut doc = Document::new("r");
        let root = doc.root();
        doc.set_attribute(root, "k", "v");
        let mut expected = crc16_update(CHECKSUM_SEED, b"r");
        expected = crc16_update(expected, b"k");
        expected = crc16_update(expected, b"v");
        assert_eq!(compute(&doc), expected);

        let leaf = doc.append_child(root, "c");
        doc.set_text(leaf, "t");
        expected = crc16_update(expected, &1u16.to_le_bytes());
        expected = crc16_update(expected, b"c");
        expected = crc16_update(expected, b"t");
        assert_eq!(compute(&doc), expected);
    }

    #[test]
    fn test_siblings_after_subtree_use_parent_depth() {
        let mut doc = Document::new("r");
        let root = doc.root();
        let a = doc.append_child(root, "a");
        doc.append_child(a, "x");
        doc.append_child(root, "b");

        let mut expected = crc16_update(CHECKSUM_SEED, b"r");
        expected = crc16_update(expected, &1u16.to_le_bytes());
        expected = crc16_update(expected, b"a");
        expected = crc16_update(expected, &2u16.to_le_bytes());
        expected = crc16_update(expected, b"x");
        expected = crc16_update(expected, b"b");
        assert_eq!(compute(&doc), expected);
    }

    #[test]
    fn test_child_checksum_attribute_is_covered() {
        let mut doc = Document::new("root");
        let root = doc.root();
        let child = doc.append_child(root, "child");
        doc.set_attribute(child, CHECKSUM_ATTRIBUTE, "1");
        let before = compute(&doc);
        doc.set_attribute(child, CHECKSUM_ATTRIBUTE, "2");
        assert_ne!(compute(&doc), before);
    }

    #[test]
    fn test_structure_changes_checksum() {
        let mut flat = Document::new("root");
        let root = flat.root();
        flat.append_child(root, "a");
        flat.append_child(root, "b");

        let mut nested = Document::new("root");
        let root = nested.root();
        let a = nested.append_child(root, "a");
        nested.append_child(a, "b");

        assert_ne!(compute(&flat), compute(&nested));
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(format_checksum(0x1), "0x0001");
        assert_eq!(format_checksum(0xBEEF), "0xBEEF");
        assert_eq!(parse_checksum("0xbeef"), Some(0xBEEF));
        assert_eq!(parse_checksum("BEEF"), Some(0xBEEF));
        assert_eq!(parse_checksum("0x10000"), None);
        assert_eq!(parse_checksum("zz"), None);
        assert_eq!(parse_checksum("0x+BEE"), None);
    }

    #[test]
    fn test_load_requires_checksum() {
        let result = load(b"<root><a/></root>");
        assert!(matches!(result, Err(XmlError::MissingChecksum)));
    }

    #[test]
    fn test_save_then_load_verifies() {
        let mut doc = Document::new("root");
        let root = doc.root();
        let a = doc.append_child(root, "a");
        doc.set_text(a, "value");
        let bytes = save(&mut doc).expect("save");
        let loaded = load(&bytes).expect("load");
        assert!(loaded.is_valid());
        assert!(loaded.verified().is_ok());
    }

    #[test]
    fn test_mismatch_keeps_document() {
        let loaded = load(b"<root checksum=\"0x0000\"><a>x</a></root>").expect("load");
        assert!(!loaded.is_valid());
        assert_eq!(loaded.stored, Some(0));
        let root = loaded.document.root();
        assert_eq!(loaded.document.child_text(root, "a"), Some("x"));
        assert!(matches!(
            loaded.verified(),
            Err(XmlError::ChecksumMismatch { stored: Some(0), .. })
        ));
    }
}
