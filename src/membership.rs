//! Membership functions mapping a crisp value to a degree of membership.
//!
//! Every family is a small `Copy` struct owning its shape parameters. The
//! parameters are fixed at construction and evaluation is a pure function of
//! the input and those parameters. [`Shape`] wraps all families in a single
//! tagged union for callers that pick the family at runtime.
//!
//! Equality and hashing compare parameters by bit pattern, so an instance
//! always equals itself, NaN parameters included.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::math::interp_one;

pub trait MembershipFunction: fmt::Display {
    /// Degree of membership of `x`.
    fn evaluate(&self, x: f64) -> f64;
}

impl<M: MembershipFunction + ?Sized> MembershipFunction for &M {
    fn evaluate(&self, x: f64) -> f64 {
        (**self).evaluate(x)
    }
}

impl<M: MembershipFunction + ?Sized> MembershipFunction for Box<M> {
    fn evaluate(&self, x: f64) -> f64 {
        (**self).evaluate(x)
    }
}

fn bits_eq(lhs: &[f64], rhs: &[f64]) -> bool {
    lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| l.to_bits() == r.to_bits())
}

fn write_params(f: &mut fmt::Formatter<'_>, name: &str, params: &[f64]) -> fmt::Result {
    write!(f, "{name}(")?;

    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{param}")?;
    }

    f.write_str(")")
}

#[inline]
fn sigmoid(a: f64, b: f64, x: f64) -> f64 {
    1. / (1. + (-a * (x - b)).exp())
}

macro_rules! shape {
    ($(#[$meta:meta])* $name:ident($($param:ident),+; $n:literal)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name([f64; $n]);

        impl $name {
            pub fn new($($param: f64),+) -> Self {
                Self([$($param),+])
            }

            pub fn params(&self) -> [f64; $n] {
                self.0
            }
        }

        impl From<[f64; $n]> for $name {
            fn from(params: [f64; $n]) -> Self {
                Self(params)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                bits_eq(&self.0, &other.0)
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                for param in self.0 {
                    param.to_bits().hash(state);
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_params(f, stringify!($name), &self.0)
            }
        }

        impl From<$name> for Shape {
            fn from(shape: $name) -> Self {
                Shape::$name(shape)
            }
        }
    };
}

shape! {
    /// `max(min(x - a, x / (c - b)), 0)`.
    ///
    /// Note the second term divides `x` itself rather than `c - x`, so this is
    /// not the textbook triangle and it can exceed one far from the origin.
    Triangular(a, b, c; 3)
}

impl MembershipFunction for Triangular {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c] = self.0;

        f64::max(f64::min(x - a, x / (c - b)), 0.)
    }
}

shape! {
    /// `max(min((x - a) / (b - a), 1, (d - x) / (d - c)), 0)`
    Trapezoidal(a, b, c, d; 4)
}

impl MembershipFunction for Trapezoidal {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.0;

        f64::max(f64::min(f64::min((x - a) / (b - a), 1.), (d - x) / (d - c)), 0.)
    }
}

shape! {
    /// Bell curve centred on `a` with standard deviation `sigma`.
    Gaussian(a, sigma; 2)
}

impl MembershipFunction for Gaussian {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, sigma] = self.0;

        (-(x - a).powi(2) / (2. * sigma.powi(2))).exp()
    }
}

fn bell(a: f64, b: f64, c: f64, x: f64) -> f64 {
    1. / (1. + ((x - c) / a).abs().powf(2. * b))
}

shape! {
    /// `1 / (1 + |(x - c) / a|^(2b))`: width `a`, slope `b`, centre `c`.
    GaussianBellShaped(a, b, c; 3)
}

impl MembershipFunction for GaussianBellShaped {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c] = self.0;

        bell(a, b, c, x)
    }
}

shape! {
    /// Same curve as [`GaussianBellShaped`], under the name toolkits usually
    /// give it. The two never compare equal to each other.
    GeneralizedBellShaped(a, b, c; 3)
}

impl MembershipFunction for GeneralizedBellShaped {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c] = self.0;

        bell(a, b, c, x)
    }
}

shape! {
    /// `1 / (1 + exp(-a * (x - b)))`: slope `a`, crossover point `b`.
    Sigmoidal(a, b; 2)
}

impl MembershipFunction for Sigmoidal {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b] = self.0;

        sigmoid(a, b, x)
    }
}

shape! {
    /// `sig(a, b) - sig(c, d)`
    DifferentialSigmoidal(a, b, c, d; 4)
}

impl MembershipFunction for DifferentialSigmoidal {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.0;

        sigmoid(a, b, x) - sigmoid(c, d, x)
    }
}

shape! {
    /// `sig(a, b) * sig(c, d)`
    ProductSigmoidal(a, b, c, d; 4)
}

impl MembershipFunction for ProductSigmoidal {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.0;

        sigmoid(a, b, x) * sigmoid(c, d, x)
    }
}

shape! {
    /// `1 / (1 + b * exp(-a * x))`
    SShaped(a, b; 2)
}

impl MembershipFunction for SShaped {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b] = self.0;

        1. / (1. + b * (-a * x).exp())
    }
}

shape! {
    /// Spline falling from one at `a` to zero at `b`.
    ZShaped(a, b; 2)
}

impl MembershipFunction for ZShaped {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b] = self.0;

        if x <= a {
            1.
        } else if x <= (a + b) / 2. {
            1. - 2. * ((x - a) / (b - a)).powi(2)
        } else if x <= b {
            2. * ((b - x) / (b - a)).powi(2)
        } else {
            0.
        }
    }
}

shape! {
    /// One on `[b, c]`, zero outside `(a, d)`.
    ///
    /// Only the rising side `(a, b)` has a ramp, the sigmoid
    /// `1 / (1 + exp(-a * (x - b)))`. The falling side `(c, d)` evaluates to zero.
    PiShaped(a, b, c, d; 4)
}

impl MembershipFunction for PiShaped {
    fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.0;

        if x <= a || x >= d {
            0.
        } else if b <= x && x <= c {
            1.
        } else if x <= b {
            sigmoid(a, b, x)
        } else {
            0.
        }
    }
}

/// Linear interpolation between `(x, degree)` breakpoints, holding the end
/// degrees outside them.
#[derive(Clone, Debug)]
pub struct PiecewiseLinear(Vec<(f64, f64)>);

impl PiecewiseLinear {
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let mut points: Vec<_> = points.into_iter().collect();

        if points.is_empty() {
            return Err(Error::EmptyBreakpoints);
        }

        // Stable, so vertical steps keep the order they were given in
        points.sort_by(|(x1, _), (x2, _)| x1.total_cmp(x2));

        Ok(Self(points))
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.0
    }
}

impl MembershipFunction for PiecewiseLinear {
    fn evaluate(&self, x: f64) -> f64 {
        interp_one(x, &self.0)
    }
}

impl PartialEq for PiecewiseLinear {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(&(x1, y1), &(x2, y2))| bits_eq(&[x1, y1], &[x2, y2]))
    }
}

impl Eq for PiecewiseLinear {}

impl Hash for PiecewiseLinear {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);

        for (x, y) in &self.0 {
            x.to_bits().hash(state);
            y.to_bits().hash(state);
        }
    }
}

impl fmt::Display for PiecewiseLinear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PiecewiseLinear[")?;

        for (i, (x, y)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({x}, {y})")?;
        }

        f.write_str("]")
    }
}

/// Tag naming a membership function family.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Family {
    Triangular,
    Trapezoidal,
    Gaussian,
    GaussianBellShaped,
    GeneralizedBellShaped,
    Sigmoidal,
    DifferentialSigmoidal,
    ProductSigmoidal,
    SShaped,
    ZShaped,
    PiShaped,
}

impl Family {
    pub const ALL: [Family; 11] = [
        Family::Triangular,
        Family::Trapezoidal,
        Family::Gaussian,
        Family::GaussianBellShaped,
        Family::GeneralizedBellShaped,
        Family::Sigmoidal,
        Family::DifferentialSigmoidal,
        Family::ProductSigmoidal,
        Family::SShaped,
        Family::ZShaped,
        Family::PiShaped,
    ];

    /// Number of shape parameters the family takes.
    pub fn arity(self) -> usize {
        match self {
            Self::Gaussian | Self::Sigmoidal | Self::SShaped | Self::ZShaped => 2,
            Self::Triangular | Self::GaussianBellShaped | Self::GeneralizedBellShaped => 3,
            Self::Trapezoidal | Self::DifferentialSigmoidal | Self::ProductSigmoidal | Self::PiShaped => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Triangular => "triangular",
            Self::Trapezoidal => "trapezoidal",
            Self::Gaussian => "gaussian",
            Self::GaussianBellShaped => "gaussian-bell",
            Self::GeneralizedBellShaped => "generalized-bell",
            Self::Sigmoidal => "sigmoidal",
            Self::DifferentialSigmoidal => "differential-sigmoidal",
            Self::ProductSigmoidal => "product-sigmoidal",
            Self::SShaped => "s-shaped",
            Self::ZShaped => "z-shaped",
            Self::PiShaped => "pi-shaped",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    /// Accepts the long names from [`Family::name`] and the usual toolkit
    /// short names (`trimf`, `gbellmf`, ...), ignoring case, `_` and `-`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let family = match key.as_str() {
            "triangular" | "trimf" => Self::Triangular,
            "trapezoidal" | "trapmf" => Self::Trapezoidal,
            "gaussian" | "gaussmf" => Self::Gaussian,
            "gaussianbell" | "gaussianbellshaped" | "bellmf" => Self::GaussianBellShaped,
            "generalizedbell" | "generalizedbellshaped" | "gbellmf" => Self::GeneralizedBellShaped,
            "sigmoidal" | "sigmf" => Self::Sigmoidal,
            "differentialsigmoidal" | "dsigmf" => Self::DifferentialSigmoidal,
            "productsigmoidal" | "psigmf" => Self::ProductSigmoidal,
            "sshaped" | "smf" => Self::SShaped,
            "zshaped" | "zmf" => Self::ZShaped,
            "pishaped" | "pimf" => Self::PiShaped,
            _ => return Err(Error::UnknownFamily(s.to_owned())),
        };

        Ok(family)
    }
}

/// Any of the parametric membership function families.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Shape {
    Triangular(Triangular),
    Trapezoidal(Trapezoidal),
    Gaussian(Gaussian),
    GaussianBellShaped(GaussianBellShaped),
    GeneralizedBellShaped(GeneralizedBellShaped),
    Sigmoidal(Sigmoidal),
    DifferentialSigmoidal(DifferentialSigmoidal),
    ProductSigmoidal(ProductSigmoidal),
    SShaped(SShaped),
    ZShaped(ZShaped),
    PiShaped(PiShaped),
}

fn fixed<const N: usize>(family: Family, params: &[f64]) -> Result<[f64; N]> {
    params.try_into().map_err(|_| Error::ParameterCount {
        family,
        expected: N,
        actual: params.len(),
    })
}

impl Shape {
    /// Builds a family from its tag and parameters, in the order the family's
    /// constructor takes them.
    pub fn new(family: Family, params: &[f64]) -> Result<Self> {
        let shape = match family {
            Family::Triangular => Self::Triangular(Triangular(fixed(family, params)?)),
            Family::Trapezoidal => Self::Trapezoidal(Trapezoidal(fixed(family, params)?)),
            Family::Gaussian => Self::Gaussian(Gaussian(fixed(family, params)?)),
            Family::GaussianBellShaped => Self::GaussianBellShaped(GaussianBellShaped(fixed(family, params)?)),
            Family::GeneralizedBellShaped => {
                Self::GeneralizedBellShaped(GeneralizedBellShaped(fixed(family, params)?))
            },
            Family::Sigmoidal => Self::Sigmoidal(Sigmoidal(fixed(family, params)?)),
            Family::DifferentialSigmoidal => {
                Self::DifferentialSigmoidal(DifferentialSigmoidal(fixed(family, params)?))
            },
            Family::ProductSigmoidal => Self::ProductSigmoidal(ProductSigmoidal(fixed(family, params)?)),
            Family::SShaped => Self::SShaped(SShaped(fixed(family, params)?)),
            Family::ZShaped => Self::ZShaped(ZShaped(fixed(family, params)?)),
            Family::PiShaped => Self::PiShaped(PiShaped(fixed(family, params)?)),
        };

        Ok(shape)
    }

    pub fn family(&self) -> Family {
        match self {
            Self::Triangular(_) => Family::Triangular,
            Self::Trapezoidal(_) => Family::Trapezoidal,
            Self::Gaussian(_) => Family::Gaussian,
            Self::GaussianBellShaped(_) => Family::GaussianBellShaped,
            Self::GeneralizedBellShaped(_) => Family::GeneralizedBellShaped,
            Self::Sigmoidal(_) => Family::Sigmoidal,
            Self::DifferentialSigmoidal(_) => Family::DifferentialSigmoidal,
            Self::ProductSigmoidal(_) => Family::ProductSigmoidal,
            Self::SShaped(_) => Family::SShaped,
            Self::ZShaped(_) => Family::ZShaped,
            Self::PiShaped(_) => Family::PiShaped,
        }
    }

    pub fn params(&self) -> &[f64] {
        match self {
            Self::Triangular(s) => &s.0,
            Self::Trapezoidal(s) => &s.0,
            Self::Gaussian(s) => &s.0,
            Self::GaussianBellShaped(s) => &s.0,
            Self::GeneralizedBellShaped(s) => &s.0,
            Self::Sigmoidal(s) => &s.0,
            Self::DifferentialSigmoidal(s) => &s.0,
            Self::ProductSigmoidal(s) => &s.0,
            Self::SShaped(s) => &s.0,
            Self::ZShaped(s) => &s.0,
            Self::PiShaped(s) => &s.0,
        }
    }

    fn inner(&self) -> &dyn MembershipFunction {
        match self {
            Self::Triangular(s) => s,
            Self::Trapezoidal(s) => s,
            Self::Gaussian(s) => s,
            Self::GaussianBellShaped(s) => s,
            Self::GeneralizedBellShaped(s) => s,
            Self::Sigmoidal(s) => s,
            Self::DifferentialSigmoidal(s) => s,
            Self::ProductSigmoidal(s) => s,
            Self::SShaped(s) => s,
            Self::ZShaped(s) => s,
            Self::PiShaped(s) => s,
        }
    }
}

impl MembershipFunction for Shape {
    fn evaluate(&self, x: f64) -> f64 {
        self.inner().evaluate(x)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}
