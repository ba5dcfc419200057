//! Fully materialized subdivision trees.

use super::subdivide::{subdivide, SubdivisionOptions};
use crate::errors::SubnetError;
use crate::models::{parse_cidr, Subnet, MAX_LENGTH};
use serde::Serialize;

/// A subnet and its children; the children tile the parent in address order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetTreeNode {
    #[serde(flatten)]
    pub subnet: Subnet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SubnetTreeNode>,
}

impl SubnetTreeNode {
    pub fn new(subnet: Subnet) -> Self {
        SubnetTreeNode {
            subnet,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total node count including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SubnetTreeNode::node_count).sum::<usize>()
    }

    /// Leaf subnets in address order.
    pub fn leaves(&self) -> Vec<&Subnet> {
        if self.is_leaf() {
            return vec![&self.subnet];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }

    /// Depth-first pre-order walk with the depth of each node below this one.
    pub fn walk(&self) -> Vec<(usize, &Subnet)> {
        let mut out = Vec::with_capacity(self.node_count());
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Subnet)>) {
        out.push((depth, &self.subnet));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }
}

/// Parse `root_cidr` and split every node in halves until `max_depth_mask`.
///
/// A `max_depth_mask` at or below the root mask gives a childless root.
pub fn build_subdivision_tree(
    root_cidr: &str,
    max_depth_mask: u8,
) -> Result<SubnetTreeNode, SubnetError> {
    let root = parse_cidr(root_cidr)?;
    let limit = max_depth_mask.min(MAX_LENGTH);
    log::debug!(
        "build_subdivision_tree({}) down to /{}",
        root.cidr(),
        limit
    );
    let mut node = SubnetTreeNode::new(root);
    grow(&mut node, limit)?;
    Ok(node)
}

fn grow(node: &mut SubnetTreeNode, limit: u8) -> Result<(), SubnetError> {
    if node.subnet.mask() >= limit {
        return Ok(());
    }
    let target = node.subnet.mask() as u32 + 1;
    node.children = subdivide(&node.subnet, SubdivisionOptions::target_mask(target))?
        .into_iter()
        .map(SubnetTreeNode::new)
        .collect();
    for child in node.children.iter_mut() {
        grow(child, limit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParseError;

    #[test]
    fn test_builds_depth() {
        let tree = build_subdivision_tree("10.0.0.0/30", 31).unwrap();
        assert_eq!(tree.children.len(), 2);
        assert!(tree.children.iter().all(|c| c.is_leaf()));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_builds_full_binary_tree() {
        let tree = build_subdivision_tree("10.0.0.0/24", 27).unwrap();
        assert_eq!(tree.node_count(), 1 + 2 + 4 + 8);
        let leaves: Vec<&str> = tree.leaves().iter().map(|s| s.cidr()).collect();
        assert_eq!(leaves.len(), 8);
        assert_eq!(leaves[0], "10.0.0.0/27");
        assert_eq!(leaves[7], "10.0.0.224/27");
    }

    #[test]
    fn test_walk_is_depth_first() {
        let tree = build_subdivision_tree("10.0.0.0/24", 26).unwrap();
        let walk: Vec<(usize, &str)> = tree.walk().into_iter().map(|(d, s)| (d, s.cidr())).collect();
        assert_eq!(
            walk,
            vec![
                (0, "10.0.0.0/24"),
                (1, "10.0.0.0/25"),
                (2, "10.0.0.0/26"),
                (2, "10.0.0.64/26"),
                (1, "10.0.0.128/25"),
                (2, "10.0.0.128/26"),
                (2, "10.0.0.192/26"),
            ]
        );
    }

    #[test]
    fn test_unreachable_depth_is_childless() {
        let tree = build_subdivision_tree("10.0.0.0/24", 16).unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_depth_beyond_host_routes_stops_at_32() {
        let tree = build_subdivision_tree("10.0.0.0/31", 40).unwrap();
        assert_eq!(tree.leaves().len(), 2);
        assert!(tree.leaves().iter().all(|s| s.mask() == 32));
    }

    #[test]
    fn test_propagates_parse_error() {
        let err = build_subdivision_tree("10.0.0/24", 26).unwrap_err();
        assert_eq!(
            err,
            SubnetError::Parse(ParseError::InvalidAddress("10.0.0".to_string()))
        );
    }
}
