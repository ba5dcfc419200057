//! Projection of a [`ViewState`] onto an ordered list of visible rows.
//!
//! Rows come from two passes. The expansion walk descends only through
//! expanded nodes. The locked back-fill then re-derives the path to every
//! locked CIDR the walk did not reach, so a locked subnet stays visible
//! whatever the expansion state of its ancestors.

use super::heuristic::should_defer_subnet_compute_with_threshold;
use crate::models::{parse_cidr, Subnet, ViewState, MAX_LENGTH};
use serde::Serialize;
use std::collections::HashSet;

/// One row of the projected table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRow {
    pub subnet: Subnet,
    /// Prefix bits below the visualized root.
    pub depth: u32,
    pub locked: bool,
    pub name: Option<String>,
    /// Lock flag of each ancestor, index 0 being the root.
    pub locked_ancestors: Vec<bool>,
}

/// Inputs of one projection call.
#[derive(Debug, Clone, Copy)]
pub struct ComputeOptions<'a> {
    pub root: &'a Subnet,
    pub state: &'a ViewState,
    /// Mask the host asked to explore down to, used for cost estimates.
    pub target_mask: u8,
}

impl<'a> ComputeOptions<'a> {
    /// Options whose target mask is the state's own depth limit.
    pub fn new(root: &'a Subnet, state: &'a ViewState) -> Self {
        ComputeOptions {
            root,
            state,
            target_mask: state.max_depth,
        }
    }

    /// Ask the deferral advisor whether this projection is too big to run inline.
    pub fn should_defer(&self, threshold: u64) -> bool {
        should_defer_subnet_compute_with_threshold(self.root.mask(), self.target_mask, threshold)
    }
}

/// Compute the visible rows, sorted by `(network, mask)`.
///
/// Never mutates its inputs. Every locked CIDR inside the root whose mask is
/// within `state.max_depth` is guaranteed a row.
pub fn compute_visible_rows(opts: &ComputeOptions) -> Vec<VisibleRow> {
    let state = opts.state;
    let limit = state.max_depth.min(MAX_LENGTH);
    let mut rows = Vec::new();
    walk(opts.root.clone(), 0, Vec::new(), state, limit, &mut rows);
    let walked = rows.len();

    let mut present: HashSet<String> = rows.iter().map(|r| r.subnet.cidr().to_string()).collect();
    for cidr in &state.locked {
        if present.contains(cidr) {
            continue;
        }
        if let Some(row) = locate_locked(opts.root, cidr, state, limit) {
            present.insert(cidr.clone());
            rows.push(row);
        }
    }
    log::debug!(
        "compute_visible_rows({}) walked={} back_filled={}",
        opts.root.cidr(),
        walked,
        rows.len() - walked
    );

    rows.sort_by(|a, b| a.subnet.cmp(&b.subnet));
    rows
}

fn walk(
    node: Subnet,
    depth: u32,
    locked_ancestors: Vec<bool>,
    state: &ViewState,
    limit: u8,
    rows: &mut Vec<VisibleRow>,
) {
    let locked = state.is_locked(node.cidr());
    let children = if state.is_expanded(node.cidr()) && node.mask() < limit {
        node.halves()
    } else {
        None
    };
    rows.push(VisibleRow {
        depth,
        locked,
        name: state.name(node.cidr()).map(String::from),
        locked_ancestors: locked_ancestors.clone(),
        subnet: node,
    });
    if let Some((lo, hi)) = children {
        let mut chain = locked_ancestors;
        chain.push(locked);
        walk(lo, depth + 1, chain.clone(), state, limit, rows);
        walk(hi, depth + 1, chain, state, limit, rows);
    }
}

/// Re-derive the path from `root` to the locked `cidr`, ignoring expansion.
///
/// Only canonical CIDRs inside the root and no deeper than `limit` can be
/// reached; anything else is skipped.
fn locate_locked(root: &Subnet, cidr: &str, state: &ViewState, limit: u8) -> Option<VisibleRow> {
    let target = match parse_cidr(cidr) {
        Ok(target) if target.cidr() == cidr => target,
        _ => {
            log::debug!("locked entry {cidr} is not a canonical CIDR, skipped");
            return None;
        }
    };
    if !root.contains(&target) || target.mask() > limit {
        return None;
    }

    let mut node = root.clone();
    let mut chain = Vec::with_capacity((target.mask() - root.mask()) as usize);
    while node.mask() < target.mask() {
        chain.push(state.is_locked(node.cidr()));
        let (lo, hi) = node.halves()?;
        node = if hi.contains(&target) { hi } else { lo };
    }

    Some(VisibleRow {
        depth: (node.mask() - root.mask()) as u32,
        locked: true,
        name: state.name(cidr).map(String::from),
        locked_ancestors: chain,
        subnet: node,
    })
}
