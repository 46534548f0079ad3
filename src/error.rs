//! Error types for ranges, membership functions and defuzzification.

use thiserror::Error;

use crate::membership::Family;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The range produced no samples but the algorithm needs at least one.
    #[error("range produced no samples")]
    InvalidRange,
    /// The membership degrees over the range sum to exactly zero.
    #[error("fuzzy curve has zero total area")]
    ZeroArea,
    #[error("range step must be finite and non-zero, got {step}")]
    InvalidStep { step: f64 },
    #[error("range bounds must be finite")]
    NonFiniteBound,
    #[error("range from {start} to {stop} by {step} has more samples than can be counted")]
    TooManySamples { start: f64, stop: f64, step: f64 },
    #[error("{family} takes {expected} parameters, got {actual}")]
    ParameterCount {
        family: Family,
        expected: usize,
        actual: usize,
    },
    #[error("unknown membership function family '{0}'")]
    UnknownFamily(String),
    #[error("unknown defuzzification method '{0}'")]
    UnknownOp(String),
    #[error("piecewise linear membership needs at least one breakpoint")]
    EmptyBreakpoints,
}
