//! Numeric reductions shared by the defuzzification methods.

use num::Float;

/// Sum of the values, zero for an empty sequence.
pub fn sum<F: Float>(values: impl IntoIterator<Item = F>) -> F {
    values.into_iter().fold(F::zero(), |accum, next| accum + next)
}

pub fn min<F: Float>(values: impl IntoIterator<Item = F>) -> Option<F> {
    values.into_iter().reduce(F::min)
}

pub fn max<F: Float>(values: impl IntoIterator<Item = F>) -> Option<F> {
    values.into_iter().reduce(F::max)
}

pub fn abs_map<F: Float>(values: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
    values.into_iter().map(F::abs)
}

/// Arithmetic mean, `None` for an empty sequence.
pub fn mean<F: Float>(values: impl IntoIterator<Item = F>) -> Option<F> {
    let (len, sum) = values
        .into_iter()
        .fold((0usize, F::zero()), |(len, accum), next| (len + 1, accum + next));

    if len == 0 {
        return None;
    }

    Some(sum / F::from(len)?)
}

/// Similar to numpy.interp for a single point: `coords` must be sorted by x.
/// Outside the coordinates the first or last y is held. Empty `coords` give zero.
pub fn interp_one<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        // Actual interpolation
        if x1 <= x && x <= x2 {
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // Only reachable with a NaN x
    y_last
}
