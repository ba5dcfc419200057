//! Moving a session in and out of the process.
//!
//! - [`payload`] - share payload JSON and base64url link parameter
//! - [`store`] - local key/value persistence under a namespace

mod payload;
mod store;

pub use payload::{SharePayload, SHARE_VERSION};
pub use store::{StateStore, DEFAULT_NAMESPACE};
