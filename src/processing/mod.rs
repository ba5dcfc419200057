//! Subnet computations.
//!
//! - `subdivide` - power-of-two subdivision
//! - `tree` - fully materialized subdivision trees
//! - `view` - projection of a view state onto visible rows
//! - `heuristic` - deferral advisor
//! - `schedule` - inline/deferred execution with generation tracking

mod heuristic;
mod schedule;
mod subdivide;
mod tree;
mod view;

pub use heuristic::{
    estimate_potential_row_count, should_defer_subnet_compute,
    should_defer_subnet_compute_with_threshold, DEFAULT_DEFER_THRESHOLD,
};
pub use schedule::{Projection, ProjectionScheduler};
pub use subdivide::{subdivide, SubdivisionOptions};
pub use tree::{build_subdivision_tree, SubnetTreeNode};
pub use view::{compute_visible_rows, ComputeOptions, VisibleRow};
