pub mod cell;
pub mod grid;
pub mod liquid_state;

pub use cell::{Cell, CellType, SettleStatus};
pub use grid::{BorderPolicy, Direction, Grid};
pub use liquid_state::{LiquidState, log_liquid_diagnostics, step_liquid};
