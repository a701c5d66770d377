use serde::{Deserialize, Serialize};

use crate::content::TypedContent;
use crate::datapool::DataPoolInfo;

/// A named, typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedElement {
    pub name: String,
    pub value: TypedContent,
}

impl InterpretedElement {
    pub fn new(name: impl Into<String>, value: impl Into<TypedContent>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretedList {
    pub name: String,
    pub elements: Vec<InterpretedElement>,
}

impl InterpretedList {
    pub fn new(name: impl Into<String>, elements: Vec<InterpretedElement>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretedDataPool {
    pub info: DataPoolInfo,
    pub lists: Vec<InterpretedList>,
}

impl InterpretedDataPool {
    #[must_use]
    pub fn new(info: DataPoolInfo, lists: Vec<InterpretedList>) -> Self {
        Self { info, lists }
    }
}

/// Typed view of a node's data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretedNode {
    pub name: String,
    pub data_pools: Vec<InterpretedDataPool>,
}

impl InterpretedNode {
    pub fn new(name: impl Into<String>, data_pools: Vec<InterpretedDataPool>) -> Self {
        Self {
            name: name.into(),
            data_pools,
        }
    }

    /// Data pool identities in declaration order.
    pub fn data_pool_infos(&self) -> impl Iterator<Item = &DataPoolInfo> {
        self.data_pools.iter().map(|data_pool| &data_pool.info)
    }

    /// Number of elements over all data pools and lists.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.data_pools
            .iter()
            .flat_map(|data_pool| &data_pool.lists)
            .map(|list| list.elements.len())
            .sum()
    }
}
