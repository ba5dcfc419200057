//! Hierarchical IPv4 subnet exploration.
//!
//! - [`models`] - CIDR values, view state and sessions
//! - [`processing`] - subdivision, trees, view projection and deferral
//! - [`share`] - share payloads and the persisted state store
//! - [`output`] - terminal table and CSV
//! - [`app`] - command dispatch used by the binary

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod output;
pub mod processing;
pub mod share;

pub use errors::{ParseError, ShareError, SubdivisionError, SubnetError};
pub use models::{format_subnet, parse_cidr, DisplayRecord, Session, Subnet, ViewState};
pub use processing::{
    build_subdivision_tree, compute_visible_rows, estimate_potential_row_count,
    should_defer_subnet_compute, subdivide, ComputeOptions, SubdivisionOptions, SubnetTreeNode,
    VisibleRow,
};
