use std::time::Duration;

use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod math;
pub mod solver;

// Public re-exports for clean API
pub use config::FlowParams;
pub use crate::core::{BorderPolicy, Cell, CellType, Direction, Grid, LiquidState, SettleStatus};
pub use error::{ErrorKind, FlowError, FlowResult};
pub use input::{Brush, BrushMode};
pub use math::{Coord, Real, coord};
pub use solver::{FlowEngine, StepStats, vertical_equilibrium};

use crate::core::{log_liquid_diagnostics, step_liquid};

/// Runs the liquid automaton on Bevy's fixed timestep.
#[derive(Debug, Clone)]
pub struct LiquidPlugin {
    pub width: u32,
    pub height: u32,
    pub border: BorderPolicy,
    pub params: FlowParams,
    /// Simulation steps per second
    pub tick_hz: f64,
}

impl Default for LiquidPlugin {
    fn default() -> Self {
        Self {
            width: 128,
            height: 96,
            border: BorderPolicy::Solid,
            params: FlowParams::default(),
            tick_hz: 60.0,
        }
    }
}

impl Plugin for LiquidPlugin {
    fn build(&self, app: &mut App) {
        let state = match LiquidState::new(self.width, self.height, self.border, self.params.clone())
        {
            Ok(state) => state,
            Err(err) => {
                bevy::log::error!("liquid simulation disabled: {err}");
                return;
            }
        };

        app.insert_resource(state)
            .insert_resource(Time::<Fixed>::from_duration(Duration::from_secs_f64(
                1.0 / self.tick_hz.max(1.0),
            )))
            .add_systems(FixedUpdate, (step_liquid, log_liquid_diagnostics).chain());
    }
}
