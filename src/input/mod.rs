pub mod brush;

pub use brush::{Brush, BrushMode};
