use crate::error::{Error, Result};

const GRID_TOLERANCE: f64 = 1e-9;
const MAX_STEPS: f64 = usize::MAX as f64;

/// Evenly spaced values `start + step * i` for `i` in `0..len`.
#[derive(Clone, Debug)]
pub struct Linspace {
    start: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub(crate) fn with_step(start: f64, step: f64, len: usize) -> Self {
        Linspace {
            start,
            step,
            index: 0,
            len,
        }
    }

    #[inline]
    fn value(&self, i: usize) -> f64 {
        // Calculate the value just like numpy.linspace does
        self.start + self.step * i as f64
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            let i = self.index;
            self.index += 1;
            Some(self.value(i))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Linspace {
    #[inline]
    fn next_back(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            self.len -= 1;
            Some(self.value(self.len))
        }
    }
}

impl ExactSizeIterator for Linspace {}

/// A finite, restartable sequence of sample points between two bounds.
///
/// Sample `i` is computed as `start + i * step` rather than by repeated
/// addition, so long ranges do not drift. A negative step walks downwards.
/// A step pointing away from `stop` gives an empty range.
///
/// ```
/// use fuzzy_defuzz::NumericRange;
///
/// let range = NumericRange::new(0., 1., 0.25)?.end_inclusive(false);
/// assert_eq!(range.iter().collect::<Vec<_>>(), vec![0., 0.25, 0.5, 0.75]);
/// # Ok::<(), fuzzy_defuzz::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericRange {
    start: f64,
    stop: f64,
    step: f64,
    start_inclusive: bool,
    end_inclusive: bool,
}

impl NumericRange {
    /// Both bounds are included by default.
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(Error::NonFiniteBound);
        }
        if !step.is_finite() || step == 0. {
            return Err(Error::InvalidStep { step });
        }

        // A step away from the stop is fine at any size, it only gives an empty range
        let steps = (stop - start) / step;
        if steps.is_nan() || steps >= MAX_STEPS {
            return Err(Error::TooManySamples { start, stop, step });
        }

        Ok(Self {
            start,
            stop,
            step,
            start_inclusive: true,
            end_inclusive: true,
        })
    }

    /// `n` evenly spaced samples from `min` to `max` inclusive. Equal bounds
    /// collapse to a single sample.
    pub fn linspace(min: f64, max: f64, n: usize) -> Result<Self> {
        if n < 2 || min == max {
            let range = Self::new(min, min, 1.)?;
            return Ok(if n == 0 { range.end_inclusive(false) } else { range });
        }

        Self::new(min, max, (max - min) / (n - 1) as f64)
    }

    pub fn start_inclusive(mut self, inclusive: bool) -> Self {
        self.start_inclusive = inclusive;
        self
    }

    pub fn end_inclusive(mut self, inclusive: bool) -> Self {
        self.end_inclusive = inclusive;
        self
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Index of the first and one-past-the-last sample.
    fn bounds(&self) -> (usize, usize) {
        let mut steps = (self.stop - self.start) / self.step;

        if steps < 0. {
            return (0, 0);
        }

        // Snap onto the grid when rounding leaves the stop a hair out of reach
        let nearest = steps.round();
        if (steps - nearest).abs() <= GRID_TOLERANCE * nearest.max(1.) {
            steps = nearest;
        }

        let last = steps.floor();
        let mut end = (last as usize).checked_add(1).unwrap_or(usize::MAX);

        if !self.end_inclusive && last == steps {
            end -= 1;
        }

        let begin = usize::from(!self.start_inclusive).min(end);

        (begin, end)
    }

    pub fn len(&self) -> usize {
        let (begin, end) = self.bounds();

        end - begin
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Linspace {
        let (begin, end) = self.bounds();

        Linspace::with_step(self.start + self.step * begin as f64, self.step, end - begin)
    }
}

impl IntoIterator for NumericRange {
    type Item = f64;
    type IntoIter = Linspace;

    fn into_iter(self) -> Linspace {
        self.iter()
    }
}

impl IntoIterator for &NumericRange {
    type Item = f64;
    type IntoIter = Linspace;

    fn into_iter(self) -> Linspace {
        self.iter()
    }
}
