//! Binary subdivision of a subnet into equal power-of-two children.

use crate::errors::SubdivisionError;
use crate::models::{block_size, Subnet, MAX_LENGTH};

/// How to subdivide: exactly one of `target_mask` or `parts` must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubdivisionOptions {
    /// Resulting prefix length of every child.
    pub target_mask: Option<u32>,
    /// Number of equal children, must be a power of two.
    pub parts: Option<u64>,
}

impl SubdivisionOptions {
    pub fn target_mask(mask: u32) -> Self {
        SubdivisionOptions {
            target_mask: Some(mask),
            parts: None,
        }
    }

    pub fn parts(parts: u64) -> Self {
        SubdivisionOptions {
            target_mask: None,
            parts: Some(parts),
        }
    }

    /// Resolve the options against `subnet` to the child prefix length.
    pub fn resolve(&self, subnet: &Subnet) -> Result<u8, SubdivisionError> {
        let desired = match (self.target_mask, self.parts) {
            (None, None) => return Err(SubdivisionError::MissingTarget),
            (Some(_), Some(_)) => return Err(SubdivisionError::Ambiguous),
            (Some(target), None) => target,
            (None, Some(parts)) => {
                if !parts.is_power_of_two() {
                    return Err(SubdivisionError::PartsNotPowerOfTwo(parts));
                }
                subnet.mask() as u32 + parts.trailing_zeros()
            }
        };
        if desired <= subnet.mask() as u32 {
            return Err(SubdivisionError::NotMoreSpecific {
                target: desired,
                mask: subnet.mask(),
            });
        }
        if desired > MAX_LENGTH as u32 {
            return Err(SubdivisionError::TargetTooLong(desired));
        }
        Ok(desired as u8)
    }
}

/// Split `subnet` into `2^(target - mask)` contiguous children in address order.
///
/// The children tile `[network, broadcast]` exactly.
pub fn subdivide(
    subnet: &Subnet,
    options: SubdivisionOptions,
) -> Result<Vec<Subnet>, SubdivisionError> {
    let target = options.resolve(subnet)?;
    let count = 1u64 << (target - subnet.mask());
    let new_size = block_size(target);
    log::trace!(
        "subdivide({subnet}) into {count} x /{target}",
        subnet = subnet.cidr()
    );
    let children = (0..count)
        .map(|i| {
            let net = subnet.network() as u64 + i * new_size;
            Subnet::from_parts(net as u32, target)
        })
        .collect();
    Ok(children)
}
