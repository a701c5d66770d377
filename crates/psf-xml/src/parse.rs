//! XML bytes to [`Document`].

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, XmlError};
use crate::tree::{Attribute, Document, NodeId};

impl Document {
    /// Parse a document without looking at its checksum.
    ///
    /// Comments, processing instructions and doctype declarations are
    /// dropped. Text of elements that have child elements is trimmed; text
    /// of leaf elements is kept as written.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut document: Option<Document> = None;
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let id = open_element(&mut document, &stack, &start)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    open_element(&mut document, &stack, &start)?;
                }
                Event::End(_) => {
                    if let (Some(doc), Some(id)) = (document.as_mut(), stack.pop())
                        && !doc.children(id).is_empty()
                    {
                        doc.trim_text(id);
                    }
                }
                Event::Text(text) => {
                    let value = utf8(&text)?;
                    append_text(&mut document, &stack, value)?;
                }
                Event::CData(data) => {
                    let value = utf8(&data)?;
                    append_text(&mut document, &stack, value)?;
                }
                Event::GeneralRef(reference) => {
                    let resolved = match reference.resolve_char_ref()? {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = utf8(&reference)?;
                            resolve_predefined_entity(name)
                                .ok_or_else(|| {
                                    XmlError::encoding(format!("unknown entity &{name};"))
                                })?
                                .to_string()
                        }
                    };
                    append_text(&mut document, &stack, &resolved)?;
                }
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }

        if let (Some(doc), Some(open)) = (document.as_ref(), stack.last()) {
            return Err(XmlError::UnclosedElement {
                name: doc.name(*open).to_string(),
            });
        }
        let mut doc = document.ok_or(XmlError::NoRoot)?;
        let root = doc.root();
        if !doc.children(root).is_empty() {
            doc.trim_text(root);
        }
        Ok(doc)
    }
}

fn open_element(
    document: &mut Option<Document>,
    stack: &[NodeId],
    start: &BytesStart<'_>,
) -> Result<NodeId> {
    let name = utf8(start.name().as_ref())?.to_string();
    let id = if let Some(doc) = document.as_mut() {
        let Some(parent) = stack.last() else {
            return Err(XmlError::MultipleRoots { name });
        };
        doc.append_child(*parent, name)
    } else {
        document.insert(Document::new(name)).root()
    };
    if let Some(doc) = document.as_mut() {
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = utf8(attribute.key.as_ref())?.to_string();
            let value = attribute.unescape_value()?.into_owned();
            doc.push_attribute(id, Attribute::new(key, value));
        }
    }
    Ok(id)
}

fn append_text(document: &mut Option<Document>, stack: &[NodeId], text: &str) -> Result<()> {
    match (document.as_mut(), stack.last()) {
        (Some(doc), Some(id)) => {
            doc.push_text(*id, text);
            Ok(())
        }
        // Whitespace around the root element.
        _ if text.trim().is_empty() => Ok(()),
        _ => Err(XmlError::encoding("text outside of the root element")),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure() {
        let xml = br#"<?xml version="1.0" encoding="utf-8"?>
<root checksum="0x1234" kind="a">
  <!-- comment -->
  <child>text</child>
  <empty/>
  <child>  padded  </child>
</root>
"#;
        let doc = Document::from_bytes(xml).expect("parse");
        let root = doc.root();
        assert_eq!(doc.name(root), "root");
        assert_eq!(doc.attribute(root, "checksum"), Some("0x1234"));
        assert_eq!(doc.attributes(root).len(), 2);
        assert_eq!(doc.text(root), "");
        let children: Vec<&str> = doc.children(root).iter().map(|c| doc.name(*c)).collect();
        assert_eq!(children, vec!["child", "empty", "child"]);
        let texts: Vec<&str> = doc.children_named(root, "child").map(|c| doc.text(c)).collect();
        assert_eq!(texts, vec!["text", "  padded  "]);
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = br#"<root a="x &amp; y"><t>1 &lt; 2 &#65;</t><c><![CDATA[<raw>]]></c></root>"#;
        let doc = Document::from_bytes(xml).expect("parse");
        let root = doc.root();
        assert_eq!(doc.attribute(root, "a"), Some("x & y"));
        assert_eq!(doc.child_text(root, "t"), Some("1 < 2 A"));
        assert_eq!(doc.child_text(root, "c"), Some("<raw>"));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(Document::from_bytes(b"").is_err());
        assert!(Document::from_bytes(b"<a><b></a>").is_err());
        assert!(Document::from_bytes(b"<a><b>").is_err());
        assert!(matches!(
            Document::from_bytes(b"<a/><b/>"),
            Err(XmlError::MultipleRoots { .. })
        ));
        assert!(matches!(
            Document::from_bytes(b"   "),
            Err(XmlError::NoRoot)
        ));
    }
}
