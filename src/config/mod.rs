//! Configuration and parameters
//!
//! Canonical constants and the tunable flow parameters.

pub mod constants;
pub mod flow_params;

pub use constants::*;
pub use flow_params::*;
