//! Fuzzy membership functions and defuzzification over sampled ranges.
//!
//! A [`MembershipFunction`] maps a crisp value to a degree in `[0, 1]`. A
//! [`DefuzzificationOp`] evaluates one over every sample of a
//! [`NumericRange`] and reduces the resulting curve to a single crisp value.
//!
//! ```
//! use fuzzy_defuzz::{DefuzzificationOp, NumericRange, Trapezoidal};
//!
//! let range = NumericRange::new(-10., 10., 0.1)?;
//! let mf = Trapezoidal::new(-10., -8., -4., 7.);
//!
//! assert_eq!(DefuzzificationOp::SmallestOfMaxima.call(range, &mf)?, -4.);
//! # Ok::<(), fuzzy_defuzz::Error>(())
//! ```

mod error;
mod linspace;
pub mod math;
mod membership;
mod ops;

pub use error::{Error, Result};
pub use linspace::{Linspace, NumericRange};
pub use membership::{
    DifferentialSigmoidal, Family, Gaussian, GaussianBellShaped, GeneralizedBellShaped, MembershipFunction,
    PiShaped, PiecewiseLinear, ProductSigmoidal, SShaped, Shape, Sigmoidal, Trapezoidal, Triangular, ZShaped,
};
pub use ops::{fuzzify, maxima, DefuzzificationOp};
