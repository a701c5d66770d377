//! Interpreted (typed) view of a node.
//!
//! The `interpreted` block holds one `datapool` per entry of the node's
//! `datapools` identity list, in the same order:
//!
//! ```xml
//! <interpreted>
//!   <datapool>
//!     <lists>
//!       <list>
//!         <name>L0</name>
//!         <elements>
//!           <element>
//!             <name>Speed</name>
//!             <value type="uint16" is-array="false">1000</value>
//!           </element>
//!         </elements>
//!       </list>
//!     </lists>
//!   </datapool>
//! </interpreted>
//! ```

use psf_model::{InterpretedDataPool, InterpretedElement, InterpretedList, InterpretedNode};
use psf_xml::{Document, NodeId};
use tracing::debug;

use crate::base::{
    DATAPOOL_TAG, NAME_TAG, load_data_pool_infos, load_node_name, required_child,
    save_data_pool_infos, save_node_name, set_child_text,
};
use crate::content;
use crate::error::{ParamSetError, Result};
use crate::missing::MissingContent;
use crate::raw::RAW_TAG;

pub const INTERPRETED_TAG: &str = "interpreted";
const LISTS_TAG: &str = "lists";
const LIST_TAG: &str = "list";
const ELEMENTS_TAG: &str = "elements";
const ELEMENT_TAG: &str = "element";
const VALUE_TAG: &str = "value";

/// Read the interpreted record of a `node` element.
pub fn load_interpreted_node(
    doc: &Document,
    node: NodeId,
    missing: &mut MissingContent,
) -> Result<InterpretedNode> {
    let name = load_node_name(doc, node)?;
    let infos = load_data_pool_infos(doc, node, missing)?;
    let interpreted = required_child(doc, node, INTERPRETED_TAG)?;

    let mut data_pools = Vec::with_capacity(infos.len());
    for data_pool in doc.children_named(interpreted, DATAPOOL_TAG) {
        let Some(info) = infos.get(data_pools.len()) else {
            return Err(ParamSetError::invalid(
                doc.path(data_pool),
                format!(
                    "more interpreted data pools than the {} declared",
                    infos.len()
                ),
            ));
        };
        data_pools.push(InterpretedDataPool {
            info: info.clone(),
            lists: load_lists(doc, data_pool)?,
        });
    }
    if data_pools.len() != infos.len() {
        return Err(ParamSetError::invalid(
            doc.path(interpreted),
            format!(
                "{} interpreted data pools for {} declared",
                data_pools.len(),
                infos.len()
            ),
        ));
    }

    debug!(node = %name, data_pools = data_pools.len(), "loaded interpreted node");
    Ok(InterpretedNode { name, data_pools })
}

fn load_lists(doc: &Document, data_pool: NodeId) -> Result<Vec<InterpretedList>> {
    let Some(lists) = doc.child(data_pool, LISTS_TAG) else {
        return Ok(Vec::new());
    };
    doc.children_named(lists, LIST_TAG)
        .map(|list| {
            let name = load_node_name(doc, list)?;
            let elements = load_elements(doc, list)?;
            Ok(InterpretedList { name, elements })
        })
        .collect()
}

fn load_elements(doc: &Document, list: NodeId) -> Result<Vec<InterpretedElement>> {
    let Some(elements) = doc.child(list, ELEMENTS_TAG) else {
        return Ok(Vec::new());
    };
    doc.children_named(elements, ELEMENT_TAG)
        .map(|element| {
            let name = load_node_name(doc, element)?;
            let value_node = required_child(doc, element, VALUE_TAG)?;
            let value = content::decode(doc, value_node)
                .map_err(|message| ParamSetError::invalid(doc.path(value_node), message))?;
            Ok(InterpretedElement { name, value })
        })
        .collect()
}

/// Write the interpreted record into a `node` element.
///
/// An existing `interpreted` block is rebuilt in place; a new one is placed
/// before a sibling `raw` block when there is one.
pub fn save_interpreted_node(doc: &mut Document, node: NodeId, interpreted: &InterpretedNode) {
    save_node_name(doc, node, &interpreted.name);
    save_data_pool_infos(doc, node, interpreted.data_pool_infos());

    let anchor = match doc.child(node, INTERPRETED_TAG) {
        Some(existing) => {
            let next = next_sibling(doc, node, existing);
            doc.remove_child(node, existing);
            next
        }
        None => doc.child(node, RAW_TAG),
    };
    let block = match anchor {
        Some(sibling) => doc.insert_child_before(node, sibling, INTERPRETED_TAG),
        None => doc.append_child(node, INTERPRETED_TAG),
    };

    for data_pool in &interpreted.data_pools {
        let data_pool_node = doc.append_child(block, DATAPOOL_TAG);
        let lists = doc.append_child(data_pool_node, LISTS_TAG);
        for list in &data_pool.lists {
            let list_node = doc.append_child(lists, LIST_TAG);
            set_child_text(doc, list_node, NAME_TAG, list.name.as_str());
            let elements = doc.append_child(list_node, ELEMENTS_TAG);
            for element in &list.elements {
                let element_node = doc.append_child(elements, ELEMENT_TAG);
                set_child_text(doc, element_node, NAME_TAG, element.name.as_str());
                let value_node = doc.append_child(element_node, VALUE_TAG);
                content::encode(&element.value, doc, value_node);
            }
        }
    }
}

fn next_sibling(doc: &Document, parent: NodeId, child: NodeId) -> Option<NodeId> {
    let children = doc.children(parent);
    let position = children.iter().position(|id| *id == child)?;
    children.get(position + 1).copied()
}
