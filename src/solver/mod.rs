// src/solver/mod.rs
pub mod equilibrium;
pub mod flow;

pub use equilibrium::vertical_equilibrium;
pub use flow::{FlowEngine, StepStats};
