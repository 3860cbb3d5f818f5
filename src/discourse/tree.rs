//! Segmentation-tree input.
//!
//! The external discourse parser emits a nested rhetorical-structure tree:
//! each node carries an optional EDU text, the relation to its nucleus, an
//! optional nucleus subtree and a list of satellite subtrees, plus a
//! top-level list of satellite EDUs that cannot stand alone. This module
//! deserializes that shape and flattens it into the `Vec<Edu>` the rest of
//! the crate consumes.

use serde::{Deserialize, Serialize};

use super::types::{Edu, EduRole};

/// One node of the rhetorical structure tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentNode {
    /// EDU text held at this node, if any.
    #[serde(default)]
    pub edu: Option<String>,
    /// Relation of this node to its nucleus, e.g. "Elaboration".
    #[serde(default)]
    pub relation: Option<String>,
    /// Nucleus subtree.
    #[serde(default)]
    pub nucleus: Option<Box<SegmentNode>>,
    /// Satellite subtrees.
    #[serde(default)]
    pub satellites: Vec<SegmentNode>,
}

/// Parser output: the tree plus the satellites that cannot stand alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentTree {
    pub tree: SegmentNode,
    /// EDU texts that depend on their nucleus and carry no standalone claim.
    #[serde(default)]
    pub dependent_satellites: Vec<String>,
}

impl SegmentTree {
    /// Parse a segmentation result from its JSON form.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Flatten the tree into EDUs in traversal order.
    ///
    /// Role assignment follows tree position: the root and every node
    /// reached through a `nucleus` edge is a nucleus; everything under a
    /// `satellites` list is a satellite. Ids are assigned `e1`, `e2`, ... in
    /// visit order; the node's relation label is carried onto the EDU.
    pub fn flatten(&self) -> Vec<Edu> {
        let mut edus = Vec::new();
        let mut counter = 0usize;
        flatten_node(&self.tree, EduRole::Nucleus, &mut edus, &mut counter);
        edus
    }

    /// True if the given EDU text was reported as unable to stand alone.
    pub fn is_dependent(&self, text: &str) -> bool {
        self.dependent_satellites.iter().any(|s| s == text)
    }
}

fn flatten_node(node: &SegmentNode, role: EduRole, out: &mut Vec<Edu>, counter: &mut usize) {
    if let Some(text) = &node.edu {
        *counter += 1;
        let mut edu = Edu::new(format!("e{counter}"), text.clone()).with_role(role);
        if let Some(rel) = &node.relation {
            edu = edu.with_relation(rel.clone());
        }
        out.push(edu);
    }

    if let Some(nucleus) = &node.nucleus {
        flatten_node(nucleus, EduRole::Nucleus, out, counter);
    }
    for satellite in &node.satellites {
        flatten_node(satellite, EduRole::Satellite, out, counter);
    }
}
