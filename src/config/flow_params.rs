use bevy::prelude::*;
use indexmap::IndexMap;

use crate::config::constants;
use crate::error::{FlowError, FlowResult};
use crate::math::Real;

/// Tunables for the flow engine. They only shape the per-step formulas; the
/// data model and commit protocol do not depend on them.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FlowParams {
    /// Nominal capacity of a single cell
    pub max_liquid: Real,

    /// Cells below this amount are treated as empty and cleared on commit
    pub min_liquid: Real,

    /// Extra capacity a cell gains when fully compressed by the stack above it
    pub max_compression: Real,

    /// Only flows above this are multiplied by `flow_speed`
    pub min_flow_threshold: Real,

    /// Hard cap on what one cell can move into one neighbor per step
    pub max_flow_per_step: Real,

    pub flow_speed: Real,

    /// Divisor applied to the level difference for sideways flow
    pub lateral_damping: Real,

    /// Smallest per-step change that still counts as "moving"
    pub clumping_epsilon: Real,

    /// Quiet steps before a cell falls asleep
    pub settle_threshold: u32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            max_liquid: constants::MAX_LIQUID,
            min_liquid: constants::MIN_LIQUID,
            max_compression: constants::MAX_COMPRESSION,
            min_flow_threshold: constants::MIN_FLOW_THRESHOLD,
            max_flow_per_step: constants::MAX_FLOW_PER_STEP,
            flow_speed: constants::FLOW_SPEED,
            lateral_damping: constants::LATERAL_DAMPING,
            clumping_epsilon: constants::CLUMPING_EPSILON,
            settle_threshold: constants::SETTLE_THRESHOLD,
        }
    }
}

impl FlowParams {
    /// Earlier tuning: faster sideways spreading, quicker to sleep.
    pub fn legacy() -> Self {
        Self {
            lateral_damping: 3.0,
            settle_threshold: 5,
            ..Self::default()
        }
    }

    /// Larger cells with a finer dust cutoff and a generous transfer cap.
    pub fn deep() -> Self {
        Self {
            max_liquid: 2.0,
            min_liquid: 0.005,
            min_flow_threshold: 0.005,
            max_flow_per_step: 9.0,
            ..Self::default()
        }
    }

    /// Named constant sets in a stable order, for UIs that cycle through them.
    pub fn presets() -> IndexMap<&'static str, FlowParams> {
        let mut presets = IndexMap::new();
        presets.insert("canonical", Self::default());
        presets.insert("legacy", Self::legacy());
        presets.insert("deep", Self::deep());
        presets
    }

    pub fn with_flow_speed(mut self, flow_speed: Real) -> Self {
        self.flow_speed = flow_speed;
        self
    }

    pub fn with_max_flow_per_step(mut self, max_flow_per_step: Real) -> Self {
        self.max_flow_per_step = max_flow_per_step;
        self
    }

    pub fn with_lateral_damping(mut self, lateral_damping: Real) -> Self {
        self.lateral_damping = lateral_damping;
        self
    }

    pub fn with_settle_threshold(mut self, settle_threshold: u32) -> Self {
        self.settle_threshold = settle_threshold;
        self
    }

    pub fn with_clumping_epsilon(mut self, clumping_epsilon: Real) -> Self {
        self.clumping_epsilon = clumping_epsilon;
        self
    }

    /// Reject values that would break the flow formulas.
    pub fn validate(&self) -> FlowResult<()> {
        check("max_liquid", self.max_liquid, |v| v > 0.0, "must be positive")?;
        check("min_liquid", self.min_liquid, |v| v >= 0.0, "must not be negative")?;
        check(
            "max_compression",
            self.max_compression,
            |v| v >= 0.0,
            "must not be negative",
        )?;
        check(
            "min_flow_threshold",
            self.min_flow_threshold,
            |v| v >= 0.0,
            "must not be negative",
        )?;
        check(
            "max_flow_per_step",
            self.max_flow_per_step,
            |v| v > 0.0,
            "must be positive",
        )?;
        check("flow_speed", self.flow_speed, |v| v > 0.0, "must be positive")?;
        check(
            "lateral_damping",
            self.lateral_damping,
            |v| v >= 1.0,
            "must be at least 1",
        )?;
        check(
            "clumping_epsilon",
            self.clumping_epsilon,
            |v| v >= 0.0,
            "must not be negative",
        )?;
        if self.settle_threshold == 0 {
            return Err(FlowError::InvalidParameter {
                name: "settle_threshold",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Shape a raw flow: amplify only flows already above the threshold, then
    /// clamp to `[0, min(max_flow_per_step, remaining)]`.
    #[inline]
    pub fn limit_flow(&self, raw: Real, remaining: Real) -> Real {
        let mut flow = raw;
        if flow > self.min_flow_threshold {
            flow *= self.flow_speed;
        }
        let cap = self.max_flow_per_step.min(remaining);
        flow.max(0.0).min(cap)
    }
}

fn check(
    name: &'static str,
    value: Real,
    valid: impl Fn(Real) -> bool,
    reason: &'static str,
) -> FlowResult<()> {
    if !value.is_finite() {
        return Err(FlowError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if !valid(value) {
        return Err(FlowError::InvalidParameter {
            name,
            value,
            reason,
        });
    }
    Ok(())
}
