//! Vertical equilibrium under compression
//!
//! Given the combined liquid of a source and the cell below (or above) it,
//! returns the level the lower cell should settle at. Stacks slightly
//! overfill the lower cells so that gravity does not squeeze volume away.

use crate::config::FlowParams;
use crate::math::Real;

#[inline]
pub fn vertical_equilibrium(source: Real, destination: Real, params: &FlowParams) -> Real {
    let max = params.max_liquid;
    let compression = params.max_compression;
    let sum = source + destination;

    if sum <= max {
        max
    } else if sum < 2.0 * max + compression {
        (max * max + sum * compression) / (max + compression)
    } else {
        (sum + compression) / 2.0
    }
}
