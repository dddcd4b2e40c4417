//! Finalized skeleton topology.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// One skeleton node: a name and the index of its parent (None for a root).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
}

impl HierarchyNode {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    pub fn child(name: impl Into<String>, parent: usize) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
        }
    }
}

/// Immutable skeleton. Nodes are stored so that every parent precedes its children,
/// which lets a single forward pass visit parents before children.
///
/// Pose storage holds an `Arc<Hierarchy>`; the node count is fixed for the lifetime
/// of every buffer built from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    by_name: HashMap<String, usize>,
}

impl Hierarchy {
    /// Validate and finalize a node list.
    pub fn new(nodes: Vec<HierarchyNode>) -> Result<Self, PoseError> {
        if nodes.is_empty() {
            return Err(PoseError::EmptyHierarchy);
        }
        let mut by_name = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                if parent >= i {
                    return Err(PoseError::InvalidParent {
                        node: i,
                        name: node.name.clone(),
                        parent,
                    });
                }
            }
            if by_name.insert(node.name.clone(), i).is_some() {
                return Err(PoseError::DuplicateNodeName {
                    node: i,
                    name: node.name.clone(),
                });
            }
        }
        Ok(Self { nodes, by_name })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Result<&HierarchyNode, PoseError> {
        self.nodes.get(index).ok_or(PoseError::NodeOutOfRange {
            index,
            count: self.nodes.len(),
        })
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).and_then(|n| n.parent)
    }

    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .skip(index + 1)
            .filter(move |(_, n)| n.parent == Some(index))
            .map(|(i, _)| i)
    }

    /// Number of ancestors above a node (0 for a root).
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(index);
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.parent(p);
        }
        depth
    }
}

impl<'de> Deserialize<'de> for Hierarchy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let nodes = Vec::<HierarchyNode>::deserialize(deserializer)?;
        Hierarchy::new(nodes).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Hierarchy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.nodes.serialize(serializer)
    }
}
