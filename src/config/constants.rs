// Canonical constants for the liquid automaton
use crate::math::Real;

// Nominal capacity of one cell and the extra it can hold under a full stack
pub const MAX_LIQUID: Real = 1.0;
pub const MAX_COMPRESSION: Real = 0.25;

// Anything below this is dust and gets removed on commit
pub const MIN_LIQUID: Real = 0.01;

// Flow shaping
pub const MIN_FLOW_THRESHOLD: Real = 0.01;
pub const MAX_FLOW_PER_STEP: Real = 5.0;
pub const FLOW_SPEED: Real = 1.0;
pub const LATERAL_DAMPING: Real = 4.0;

// Sleep optimization
pub const CLUMPING_EPSILON: Real = 0.0001;
pub const SETTLE_THRESHOLD: u32 = 10;
