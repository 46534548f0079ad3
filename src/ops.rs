use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::math;
use crate::membership::MembershipFunction;

/// Pairs every sample with its degree, in sample order.
pub fn fuzzify<M>(range: impl IntoIterator<Item = f64>, mf: &M) -> Vec<(f64, f64)>
where
    M: MembershipFunction + ?Sized,
{
    range.into_iter().map(|x| (x, mf.evaluate(x))).collect()
}

/// Samples whose degree is exactly the maximum degree over the range, in
/// sample order. Empty for an empty range.
pub fn maxima<M>(range: impl IntoIterator<Item = f64>, mf: &M) -> Vec<(f64, f64)>
where
    M: MembershipFunction + ?Sized,
{
    maxima_of(&fuzzify(range, mf))
}

fn maxima_of(curve: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let Some(maximum) = math::max(curve.iter().map(|&(_, m)| m)) else {
        return Vec::new();
    };

    curve.iter().copied().filter(|&(_, m)| m == maximum).collect()
}

fn sorted(curve: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut curve = curve.to_vec();

    curve.sort_by(|(u1, _), (u2, _)| u1.total_cmp(u2));
    curve
}

/// Method for defuzzificating the resulting membership function.
///
/// `Centroid` and `Bisector` refuse degenerate input with an error, while the
/// maxima family answers `0.0` for an empty range. Callers relying on either
/// behaviour should not expect the other.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DefuzzificationOp {
    /// Center of Gravity, found by balancing the running degree sums from
    /// both ends of the range
    Centroid,
    /// Bisector of Area
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMaxima,
    /// Value of smallest magnitude for which the membership function is maximum
    SmallestOfMaxima,
    /// Largest magnitude for which the membership function is maximum
    LargestOfMaxima,
}

impl DefuzzificationOp {
    pub const ALL: [DefuzzificationOp; 5] = [
        Self::Centroid,
        Self::Bisector,
        Self::MeanOfMaxima,
        Self::SmallestOfMaxima,
        Self::LargestOfMaxima,
    ];

    /// Evaluates `mf` at every sample of `range` and reduces the curve to one
    /// crisp value.
    pub fn call<M>(self, range: impl IntoIterator<Item = f64>, mf: &M) -> Result<f64>
    where
        M: MembershipFunction + ?Sized,
    {
        let curve = fuzzify(range, mf);
        let result = self.reduce(&curve);

        match &result {
            Ok(value) => trace!(op = %self, %mf, samples = curve.len(), value = *value, "Defuzzificated"),
            Err(err) => debug!(op = %self, %mf, samples = curve.len(), %err, "Defuzzification failed"),
        }

        result
    }

    /// Reduces an already evaluated `(value, degree)` curve.
    pub fn reduce(self, curve: &[(f64, f64)]) -> Result<f64> {
        match self {
            Self::Centroid => {
                if curve.is_empty() {
                    return Err(Error::InvalidRange);
                }

                let curve = sorted(curve);
                let mut lower = 0;
                let mut upper = curve.len() - 1;
                let mut lower_area = 0.;
                let mut upper_area = 0.;

                while lower < upper {
                    if lower_area <= upper_area {
                        lower_area += curve[lower].1;
                        lower += 1;
                    } else {
                        upper_area += curve[upper].1;
                        upper -= 1;
                    }
                }

                Ok(curve[lower].0)
            },
            Self::Bisector => {
                let curve = sorted(curve);
                let total_area = math::sum(curve.iter().map(|&(_, m)| m));

                if total_area == 0. {
                    return Err(Error::ZeroArea);
                }

                let target = total_area / 2.;
                let mut cum_area = 0.;

                for &(u, m) in &curve {
                    cum_area += m;
                    if cum_area >= target {
                        return Ok(u);
                    }
                }

                // Only reachable when a NaN degree poisons the sums
                Ok(curve.last().map_or(0., |&(u, _)| u))
            },
            Self::MeanOfMaxima => {
                let maxima = maxima_of(curve);

                Ok(math::mean(maxima.iter().map(|&(u, _)| u)).unwrap_or(0.))
            },
            Self::SmallestOfMaxima => {
                let maxima = maxima_of(curve);

                Ok(maxima
                    .iter()
                    .map(|&(u, _)| u)
                    .min_by(|u1, u2| u1.abs().total_cmp(&u2.abs()))
                    .unwrap_or(0.))
            },
            Self::LargestOfMaxima => {
                let maxima = maxima_of(curve);

                Ok(math::max(math::abs_map(maxima.iter().map(|&(u, _)| u))).unwrap_or(0.))
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Bisector => "bisector",
            Self::MeanOfMaxima => "mean-of-maxima",
            Self::SmallestOfMaxima => "smallest-of-maxima",
            Self::LargestOfMaxima => "largest-of-maxima",
        }
    }
}

impl fmt::Display for DefuzzificationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DefuzzificationOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "centroid" | "cog" | "coa" => Self::Centroid,
            "bisector" | "boa" => Self::Bisector,
            "mean-of-maxima" | "mom" => Self::MeanOfMaxima,
            "smallest-of-maxima" | "som" => Self::SmallestOfMaxima,
            "largest-of-maxima" | "lom" => Self::LargestOfMaxima,
            _ => return Err(Error::UnknownOp(s.to_owned())),
        };

        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::linspace::NumericRange;
    use crate::membership::{Gaussian, PiecewiseLinear, Shape, Sigmoidal, Trapezoidal};

    fn range(start: f64, stop: f64, step: f64) -> NumericRange {
        NumericRange::new(start, stop, step).unwrap()
    }

    #[test]
    fn test_symmetric_sigmoid() {
        let mf = Sigmoidal::new(-10., 10.);
        let range = range(-10., 10., 0.1);

        assert_abs_diff_eq!(DefuzzificationOp::Centroid.call(range, &mf).unwrap(), 0., epsilon = 0.1);
        assert_abs_diff_eq!(DefuzzificationOp::Bisector.call(range, &mf).unwrap(), 0., epsilon = 0.1);
    }

    #[test]
    fn test_descending_range_matches_ascending() {
        let mf = Gaussian::new(2., 1.5);
        let up = range(-10., 10., 0.1);
        let down = range(10., -10., -0.1);

        // Within one step, the two grids round differently
        for op in DefuzzificationOp::ALL {
            assert_abs_diff_eq!(op.call(up, &mf).unwrap(), op.call(down, &mf).unwrap(), epsilon = 0.1 + 1e-9);
        }

        assert_abs_diff_eq!(DefuzzificationOp::Centroid.call(down, &mf).unwrap(), 2., epsilon = 0.1);
        assert_abs_diff_eq!(DefuzzificationOp::Bisector.call(down, &mf).unwrap(), 2., epsilon = 0.1);
    }

    #[test]
    fn test_trapezoid_maxima() {
        let mf = Trapezoidal::new(-10., -8., -4., 7.);
        let range = range(-10., 10., 0.1);

        assert_abs_diff_eq!(DefuzzificationOp::SmallestOfMaxima.call(range, &mf).unwrap(), -4., epsilon = 0.1);
        assert_abs_diff_eq!(DefuzzificationOp::MeanOfMaxima.call(range, &mf).unwrap(), -6., epsilon = 0.1);
        assert_abs_diff_eq!(DefuzzificationOp::LargestOfMaxima.call(range, &mf).unwrap(), 8., epsilon = 0.1);
    }

    #[test]
    fn test_maxima_plateau() {
        let mf = Trapezoidal::new(-5., -2., 10., 20.);
        let plateau = maxima(range(-10., 30., 0.1), &mf);

        assert_eq!(plateau.len(), 121);
        assert!(plateau.iter().all(|&(_, m)| m == 1.));
        assert_abs_diff_eq!(plateau[0].0, -2., epsilon = 1e-9);
        assert_abs_diff_eq!(plateau[120].0, 10., epsilon = 1e-9);
    }

    #[test]
    fn test_maxima_ties_are_exact() {
        let curve = [(0., 0.5), (1., 0.9), (2., 0.9), (3., 0.9 - f64::EPSILON), (4., 0.9)];

        assert_eq!(maxima_of(&curve), vec![(1., 0.9), (2., 0.9), (4., 0.9)]);
        assert_eq!(DefuzzificationOp::MeanOfMaxima.reduce(&curve), Ok(7. / 3.));
        assert_eq!(DefuzzificationOp::SmallestOfMaxima.reduce(&curve), Ok(1.));
        assert_eq!(DefuzzificationOp::LargestOfMaxima.reduce(&curve), Ok(4.));
    }

    #[test]
    fn test_maxima_magnitudes() {
        let curve = [(-3., 1.), (-0.5, 1.), (2., 1.), (0.5, 1.)];

        // Sign is kept, ties go to the earlier sample
        assert_eq!(DefuzzificationOp::SmallestOfMaxima.reduce(&curve), Ok(-0.5));
        assert_eq!(DefuzzificationOp::LargestOfMaxima.reduce(&curve), Ok(3.));
        assert_eq!(DefuzzificationOp::MeanOfMaxima.reduce(&curve), Ok(-0.25));
    }

    #[test]
    fn test_empty_range() {
        let mf = Sigmoidal::new(-10., 10.);
        let empty = range(0., 0., 0.1).end_inclusive(false);

        assert!(empty.is_empty());
        assert_eq!(DefuzzificationOp::Centroid.call(empty, &mf), Err(Error::InvalidRange));
        assert_eq!(DefuzzificationOp::Bisector.call(empty, &mf), Err(Error::ZeroArea));
        assert_eq!(DefuzzificationOp::MeanOfMaxima.call(empty, &mf), Ok(0.));
        assert_eq!(DefuzzificationOp::SmallestOfMaxima.call(empty, &mf), Ok(0.));
        assert_eq!(DefuzzificationOp::LargestOfMaxima.call(empty, &mf), Ok(0.));
        assert!(maxima(empty, &mf).is_empty());
    }

    #[test]
    fn test_single_sample() {
        let mf = Sigmoidal::new(-10., 10.);
        let point = range(0., 0., 0.1);

        for op in DefuzzificationOp::ALL {
            assert_eq!(op.call(point, &mf), Ok(0.), "{op}");
        }

        let point = range(2.5, 2.5, 1.);

        assert_eq!(DefuzzificationOp::Centroid.call(point, &mf), Ok(2.5));
        assert_eq!(DefuzzificationOp::Bisector.call(point, &mf), Ok(2.5));
        assert_eq!(DefuzzificationOp::LargestOfMaxima.call(point, &mf), Ok(2.5));
    }

    #[test]
    fn test_all_zero_curve() {
        let zero = PiecewiseLinear::new([(0., 0.)]).unwrap();
        let range = range(0., 1., 0.25);

        // The lower side keeps winning the balance, so centroid walks to the top
        assert_eq!(DefuzzificationOp::Centroid.call(range, &zero), Ok(1.));
        assert_eq!(DefuzzificationOp::Bisector.call(range, &zero), Err(Error::ZeroArea));
        // Every sample ties for the maximum
        assert_eq!(DefuzzificationOp::MeanOfMaxima.call(range, &zero), Ok(0.5));
        assert_eq!(DefuzzificationOp::SmallestOfMaxima.call(range, &zero), Ok(0.));
        assert_eq!(DefuzzificationOp::LargestOfMaxima.call(range, &zero), Ok(1.));
    }

    #[test]
    fn test_balancing() {
        let flat = [(0., 1.), (1., 1.), (2., 1.), (3., 1.)];
        let ramp = [(0., 0.), (1., 0.25), (2., 0.5), (3., 0.75), (4., 1.)];

        assert_eq!(DefuzzificationOp::Centroid.reduce(&flat), Ok(2.));
        assert_eq!(DefuzzificationOp::Bisector.reduce(&flat), Ok(1.));
        assert_eq!(DefuzzificationOp::Centroid.reduce(&ramp), Ok(3.));
        assert_eq!(DefuzzificationOp::Bisector.reduce(&ramp), Ok(3.));

        // Sample order does not matter
        let mut shuffled = ramp;
        shuffled.reverse();
        shuffled.swap(1, 3);

        assert_eq!(DefuzzificationOp::Centroid.reduce(&shuffled), Ok(3.));
        assert_eq!(DefuzzificationOp::Bisector.reduce(&shuffled), Ok(3.));
    }

    #[test]
    fn test_slices_and_dyn() {
        let values = [-1., 0., 1., 2.];
        let mf: Box<dyn MembershipFunction> = Box::new(Shape::from(Trapezoidal::new(-2., 0., 1., 3.)));

        assert_eq!(DefuzzificationOp::SmallestOfMaxima.call(values.iter().copied(), &mf), Ok(0.));
        assert_eq!(DefuzzificationOp::LargestOfMaxima.call(values, &*mf), Ok(1.));
        assert_eq!(DefuzzificationOp::MeanOfMaxima.call(values, mf.as_ref()), Ok(0.5));
    }

    #[test]
    fn test_idempotent() {
        let mf = Gaussian::new(2., 1.5);
        let range = range(-5., 9., 0.1);

        for op in DefuzzificationOp::ALL {
            assert_eq!(op.call(range, &mf), op.call(range, &mf));
        }

        assert_eq!(fuzzify(range, &mf), fuzzify(range, &mf));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("cog".parse::<DefuzzificationOp>(), Ok(DefuzzificationOp::Centroid));
        assert_eq!("BOA".parse::<DefuzzificationOp>(), Ok(DefuzzificationOp::Bisector));
        assert_eq!("mean_of_maxima".parse::<DefuzzificationOp>(), Ok(DefuzzificationOp::MeanOfMaxima));
        assert_eq!(
            "median".parse::<DefuzzificationOp>(),
            Err(Error::UnknownOp("median".to_owned()))
        );

        for op in DefuzzificationOp::ALL {
            assert_eq!(op.to_string().parse::<DefuzzificationOp>(), Ok(op));
        }
    }
}
