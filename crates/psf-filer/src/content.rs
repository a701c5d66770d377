//! Codec for typed element values.
//!
//! A value element names its type and array flag in attributes and holds
//! the values as `;`-separated text:
//!
//! ```xml
//! <value type="uint16" is-array="false">1000</value>
//! <value type="float32" is-array="true">0.5;1.25</value>
//! ```

use std::str::FromStr;

use psf_model::{ContentType, ContentValues, TypedContent};
use psf_xml::{Document, NodeId};

pub const TYPE_ATTRIBUTE: &str = "type";
pub const ARRAY_ATTRIBUTE: &str = "is-array";

/// Separator between values, shared with raw byte lists.
pub const DELIMITER: &str = ";";

/// Decode a value element.
pub fn decode(doc: &Document, node: NodeId) -> Result<TypedContent, String> {
    let type_name = doc
        .attribute(node, TYPE_ATTRIBUTE)
        .ok_or_else(|| format!("missing attribute \"{TYPE_ATTRIBUTE}\""))?;
    let content_type = ContentType::from_str(type_name).map_err(|e| e.to_string())?;
    let is_array = match doc.attribute(node, ARRAY_ATTRIBUTE) {
        Some("true") => true,
        Some("false") => false,
        Some(other) => return Err(format!("invalid \"{ARRAY_ATTRIBUTE}\" value \"{other}\"")),
        None => return Err(format!("missing attribute \"{ARRAY_ATTRIBUTE}\"")),
    };

    let tokens = split_tokens(doc.text(node));
    let values = match content_type {
        ContentType::Uint8 => ContentValues::Uint8(parse_tokens(&tokens, content_type)?),
        ContentType::Uint16 => ContentValues::Uint16(parse_tokens(&tokens, content_type)?),
        ContentType::Uint32 => ContentValues::Uint32(parse_tokens(&tokens, content_type)?),
        ContentType::Uint64 => ContentValues::Uint64(parse_tokens(&tokens, content_type)?),
        ContentType::Sint8 => ContentValues::Sint8(parse_tokens(&tokens, content_type)?),
        ContentType::Sint16 => ContentValues::Sint16(parse_tokens(&tokens, content_type)?),
        ContentType::Sint32 => ContentValues::Sint32(parse_tokens(&tokens, content_type)?),
        ContentType::Sint64 => ContentValues::Sint64(parse_tokens(&tokens, content_type)?),
        ContentType::Float32 => ContentValues::Float32(parse_tokens(&tokens, content_type)?),
        ContentType::Float64 => ContentValues::Float64(parse_tokens(&tokens, content_type)?),
    };

    if is_array {
        Ok(TypedContent::array(values))
    } else {
        TypedContent::scalar(values).map_err(|e| e.to_string())
    }
}

/// Encode a value into an element, replacing its attributes and text.
pub fn encode(content: &TypedContent, doc: &mut Document, node: NodeId) {
    doc.set_attribute(node, TYPE_ATTRIBUTE, content.content_type().as_str());
    doc.set_attribute(
        node,
        ARRAY_ATTRIBUTE,
        if content.is_array() { "true" } else { "false" },
    );
    doc.set_text(node, join_values(content.values()));
}

/// Join values with the delimiter, shortest round-trip float formatting.
#[must_use]
pub fn join_values(values: &ContentValues) -> String {
    values.to_strings().join(DELIMITER)
}

/// Split delimited text; empty or blank text has no tokens.
pub(crate) fn split_tokens(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        text.split(DELIMITER).map(str::trim).collect()
    }
}

fn parse_tokens<T: FromStr>(tokens: &[&str], content_type: ContentType) -> Result<Vec<T>, String> {
    tokens
        .iter()
        .map(|token| {
            token
                .parse()
                .map_err(|_| format!("invalid {content_type} value \"{token}\""))
        })
        .collect()
}
