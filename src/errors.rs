//! Error types for subnet parsing, subdivision and share payloads.

use thiserror::Error;

/// Malformed CIDR or address text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The `/` separator is missing (or repeated).
    #[error("CIDR must include /mask: {0}")]
    MissingMask(String),

    /// The address does not have exactly four dot-separated octets.
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    /// An octet is empty or not a decimal number.
    #[error("Invalid IPv4 segment: {0}")]
    InvalidOctet(String),

    /// An octet is outside 0..=255.
    #[error("Invalid IPv4 segment range: {0}")]
    OctetOutOfRange(String),

    /// The prefix length is not an integer in 0..=32.
    #[error("Invalid mask: {0}")]
    InvalidMask(String),
}

/// Invalid subdivision request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubdivisionError {
    #[error("Provide target mask or parts")]
    MissingTarget,

    #[error("Provide either target mask or parts, not both")]
    Ambiguous,

    #[error("parts must be power of two, got {0}")]
    PartsNotPowerOfTwo(u64),

    #[error("target mask /{target} must be larger (more specific) than /{mask}")]
    NotMoreSpecific { target: u32, mask: u8 },

    #[error("target mask /{0} cannot exceed /32")]
    TargetTooLong(u32),
}

/// Any failure of the subnet algebra.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubnetError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Subdivision(#[from] SubdivisionError),
}

/// Failure decoding or encoding a share payload.
#[derive(Debug, Error)]
pub enum ShareError {
    /// JSON did not match the payload shape; `path` names the offending field.
    #[error("Invalid share payload at {path}: {message}")]
    Json { path: String, message: String },

    #[error("Error serializing share payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unsupported share payload version {0}")]
    UnsupportedVersion(u32),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ShareError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        ShareError::Json {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        }
    }
}
