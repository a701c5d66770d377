//! [`Document`] to XML bytes.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::tree::{Document, NodeId};

impl Document {
    /// Serialize the document as indented UTF-8 XML.
    ///
    /// Leaves with text are written on one line, leaves without text as
    /// empty elements. Text of an element with children is written trimmed,
    /// ahead of its first child.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Serialize the document into a writer.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut xml = Writer::new_with_indent(writer, b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write_tree(&mut xml, self)?;
        xml.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

/// Elements whose start tag is written, with their children still to go.
type OpenElements<'a> = Vec<(NodeId, std::slice::Iter<'a, NodeId>)>;

fn write_tree<W: Write>(xml: &mut Writer<W>, doc: &Document) -> Result<()> {
    let mut open: OpenElements<'_> = Vec::new();
    write_start(xml, doc, doc.root(), &mut open)?;
    while let Some((id, children)) = open.last_mut() {
        let id = *id;
        match children.next() {
            Some(&child) => write_start(xml, doc, child, &mut open)?,
            None => {
                xml.write_event(Event::End(BytesEnd::new(doc.name(id))))?;
                open.pop();
            }
        }
    }
    Ok(())
}

/// Write a leaf completely, or the start tag of an element with children.
fn write_start<'a, W: Write>(
    xml: &mut Writer<W>,
    doc: &'a Document,
    id: NodeId,
    open: &mut OpenElements<'a>,
) -> Result<()> {
    let name = doc.name(id);
    let mut start = BytesStart::new(name);
    for attribute in doc.attributes(id) {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    let children = doc.children(id);
    let text = doc.stored_text(id);
    if children.is_empty() {
        if text.is_empty() {
            xml.write_event(Event::Empty(start))?;
        } else {
            xml.write_event(Event::Start(start))?;
            xml.write_event(Event::Text(BytesText::new(text)))?;
            xml.write_event(Event::End(BytesEnd::new(name)))?;
        }
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    if !text.is_empty() {
        xml.write_event(Event::Text(BytesText::new(text)))?;
    }
    open.push((id, children.iter()));
    Ok(())
}
