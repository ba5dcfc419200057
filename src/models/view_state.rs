//! User-controlled view of the subdivision hierarchy.
//!
//! CIDR strings are the only key; nothing here owns a [`Subnet`].

use super::subnet::{parse_cidr, Subnet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default maximum prefix length a view subdivides to.
pub const DEFAULT_MAX_DEPTH: u8 = 24;

/// Which CIDRs are expanded, split, locked or named, plus the depth limit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub expanded: BTreeSet<String>,
    pub locked: BTreeSet<String>,
    pub names: BTreeMap<String, String>,
    pub max_depth: u8,
    /// Subnets whose children have been logically materialized.
    #[serde(default)]
    pub split: BTreeSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(DEFAULT_MAX_DEPTH)
    }
}

impl ViewState {
    pub fn new(max_depth: u8) -> Self {
        ViewState {
            expanded: BTreeSet::new(),
            locked: BTreeSet::new(),
            names: BTreeMap::new(),
            max_depth,
            split: BTreeSet::new(),
        }
    }

    pub fn is_expanded(&self, cidr: &str) -> bool {
        self.expanded.contains(cidr)
    }

    pub fn is_locked(&self, cidr: &str) -> bool {
        self.locked.contains(cidr)
    }

    pub fn is_split(&self, cidr: &str) -> bool {
        self.split.contains(cidr)
    }

    pub fn name(&self, cidr: &str) -> Option<&str> {
        self.names.get(cidr).map(String::as_str)
    }

    /// Show the children of `cidr`.
    pub fn expand(&mut self, cidr: &str) {
        self.expanded.insert(cidr.to_string());
    }

    /// Hide the children of `cidr`; descendant expansion is kept for re-expand.
    pub fn collapse(&mut self, cidr: &str) {
        self.expanded.remove(cidr);
    }

    /// Materialize the children of `cidr` and show them.
    pub fn split(&mut self, cidr: &str) {
        self.split.insert(cidr.to_string());
        self.expand(cidr);
    }

    /// Discard the subdivision of `cidr` and forget every descendant expansion.
    pub fn join(&mut self, cidr: &str) {
        self.expanded.remove(cidr);
        self.split.remove(cidr);
        let parent = match parse_cidr(cidr) {
            Ok(parent) => parent,
            Err(e) => {
                log::warn!("join({cidr}) could not parse parent: {e}");
                return;
            }
        };
        self.expanded.retain(|ex| match parse_cidr(ex) {
            Ok(node) => !parent.is_ancestor_of(&node),
            Err(_) => true,
        });
    }

    /// Flip the lock on `cidr`; returns the new lock state.
    pub fn toggle_lock(&mut self, cidr: &str) -> bool {
        if self.locked.remove(cidr) {
            false
        } else {
            self.locked.insert(cidr.to_string());
            true
        }
    }

    /// Set or clear the display name; a non-blank name also locks the subnet.
    pub fn set_name(&mut self, cidr: &str, name: &str) {
        if name.is_empty() {
            self.names.remove(cidr);
        } else {
            self.names.insert(cidr.to_string(), name.to_string());
        }
        if !name.trim().is_empty() {
            self.locked.insert(cidr.to_string());
        }
    }

    /// True when some locked CIDR other than `subnet` lies strictly inside it.
    pub fn has_locked_descendant(&self, subnet: &Subnet) -> bool {
        self.locked
            .iter()
            .filter_map(|c| parse_cidr(c).ok())
            .any(|ls| subnet.is_ancestor_of(&ls))
    }

    pub fn can_split(&self, subnet: &Subnet) -> bool {
        subnet.mask() < self.max_depth
    }

    /// Joining would hide a locked descendant, so it is refused then.
    pub fn can_join(&self, subnet: &Subnet) -> bool {
        !self.has_locked_descendant(subnet)
    }
}
