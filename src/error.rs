//! Error types for the liquid simulator
//!
//! Configuration and coordinate errors are reported synchronously to the
//! caller. The flow engine itself never fails.

use thiserror::Error;

use crate::math::Real;

pub type FlowResult<T> = Result<T, FlowError>;

/// Broad classification of a [`FlowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Coordinate,
    Input,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// Grid dimensions must both be positive
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    /// A tunable is outside its valid range
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: Real,
        reason: &'static str,
    },

    /// Cell access outside the grid
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// NaN or infinite liquid would never be clamped away
    #[error("liquid amount {0} is not finite")]
    NonFiniteAmount(Real),

    /// Solid cells never hold liquid
    #[error("cell ({x}, {y}) is solid and cannot hold liquid")]
    SolidTarget { x: i32, y: i32 },
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions { .. } | Self::InvalidParameter { .. } => {
                ErrorKind::Configuration
            }
            Self::OutOfBounds { .. } => ErrorKind::Coordinate,
            Self::NonFiniteAmount(_) | Self::SolidTarget { .. } => ErrorKind::Input,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn is_coordinate(&self) -> bool {
        self.kind() == ErrorKind::Coordinate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        assert!(FlowError::InvalidDimensions { width: 0, height: 4 }.is_configuration());
        assert!(
            FlowError::OutOfBounds {
                x: -1,
                y: 0,
                width: 4,
                height: 4
            }
            .is_coordinate()
        );
        assert_eq!(FlowError::NonFiniteAmount(Real::NAN).kind(), ErrorKind::Input);
        assert_eq!(FlowError::SolidTarget { x: 0, y: 0 }.kind(), ErrorKind::Input);
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = FlowError::OutOfBounds {
            x: 7,
            y: 2,
            width: 4,
            height: 4,
        };
        assert_eq!(err.to_string(), "cell (7, 2) is outside the 4x4 grid");
    }
}
