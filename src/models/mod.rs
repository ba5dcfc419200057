//! Domain models for the subnet explorer.
//!
//! - `ipv4` - dotted-quad codec and mask arithmetic
//! - [`Subnet`] - normalized IPv4 block parsed from CIDR text
//! - [`ViewState`] - expanded/locked/named CIDRs and the depth limit
//! - [`Session`] - root CIDR text plus its view state

mod ipv4;
mod session;
mod subnet;
mod view_state;

pub use ipv4::{
    block_size, broadcast_bits, format_addr, mask_bits, network_bits, parse_addr, MAX_LENGTH,
};
pub use session::{Session, DEFAULT_CIDR};
pub use subnet::{format_subnet, parse_cidr, DisplayRecord, Subnet};
pub use view_state::{ViewState, DEFAULT_MAX_DEPTH};
