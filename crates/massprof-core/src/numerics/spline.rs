//! Cubic spline over tabulated `(x, y)` samples.
//!
//! Used for the cooling-function and temperature profiles that weight the
//! projection and the derived quantities. Evaluation outside the sampled range
//! returns the nearest boundary value instead of extrapolating the cubic.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    #[error(
        "spline abscissae must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingAbscissa {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("spline sample at index {index} must be finite, got ({x}, {y})")]
    NonFiniteSample { index: usize, x: f64, y: f64 },
    #[error("spline requires at least 2 samples, got {actual}")]
    InsufficientPoints { actual: usize },
    #[error("spline second-derivative table has not been built")]
    NotBuilt,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    second_derivatives: Option<Vec<f64>>,
}

impl CubicSpline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes every sample and builds a natural spline.
    pub fn natural_from_points<I>(points: I) -> Result<Self, SplineError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut spline = Self::new();
        for (x, y) in points {
            spline.push_point(x, y)?;
        }
        spline.build_natural()?;
        Ok(spline)
    }

    /// Appends a sample. Invalidates any previously built table.
    pub fn push_point(&mut self, x: f64, y: f64) -> Result<(), SplineError> {
        let index = self.x.len();
        if !x.is_finite() || !y.is_finite() {
            return Err(SplineError::NonFiniteSample { index, x, y });
        }
        if let Some(previous) = self.x.last().copied() {
            if x <= previous {
                return Err(SplineError::NonIncreasingAbscissa {
                    index,
                    previous,
                    current: x,
                });
            }
        }

        self.x.push(x);
        self.y.push(y);
        self.second_derivatives = None;
        Ok(())
    }

    pub fn build_natural(&mut self) -> Result<(), SplineError> {
        self.build(0.0, 0.0)
    }

    /// Computes the second-derivative table.
    ///
    /// A boundary argument whose magnitude is below `f64::EPSILON` selects the
    /// natural condition at that end; otherwise it is used as the boundary
    /// first derivative.
    pub fn build(&mut self, left_slope: f64, right_slope: f64) -> Result<(), SplineError> {
        let n = self.x.len();
        if n < 2 {
            return Err(SplineError::InsufficientPoints { actual: n });
        }

        let x = &self.x;
        let y = &self.y;
        let mut y2 = vec![0.0; n];
        let mut u = vec![0.0; n];

        if left_slope.abs() >= f64::EPSILON {
            let h = x[1] - x[0];
            y2[0] = -0.5;
            u[0] = (3.0 / h) * ((y[1] - y[0]) / h - left_slope);
        }

        for i in 1..n - 1 {
            let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;
            let slope_jump =
                (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
            u[i] = (6.0 * slope_jump / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
        }

        let (qn, un) = if right_slope.abs() < f64::EPSILON {
            (0.0, 0.0)
        } else {
            let h = x[n - 1] - x[n - 2];
            (0.5, (3.0 / h) * (right_slope - (y[n - 1] - y[n - 2]) / h))
        };

        y2[n - 1] = (un - qn * u[n - 2]) / (qn * y2[n - 2] + 1.0);
        for i in (0..n - 1).rev() {
            y2[i] = y2[i] * y2[i + 1] + u[i];
        }

        self.second_derivatives = Some(y2);
        Ok(())
    }

    pub fn evaluate(&self, x: f64) -> Result<f64, SplineError> {
        let n = self.x.len();
        if n < 2 {
            return Err(SplineError::InsufficientPoints { actual: n });
        }
        let y2 = self
            .second_derivatives
            .as_deref()
            .ok_or(SplineError::NotBuilt)?;

        if x <= self.x[0] {
            return Ok(self.y[0]);
        }
        if x >= self.x[n - 1] {
            return Ok(self.y[n - 1]);
        }

        // First sample strictly above x; bisection via partition_point.
        let hi = self.x.partition_point(|sample| *sample <= x);
        let lo = hi - 1;

        let h = self.x[hi] - self.x[lo];
        let a = (self.x[hi] - x) / h;
        let b = (x - self.x[lo]) / h;
        Ok(a * self.y[lo]
            + b * self.y[hi]
            + ((a * a * a - a) * y2[lo] + (b * b * b - b) * y2[hi]) * (h * h) / 6.0)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn is_built(&self) -> bool {
        self.second_derivatives.is_some()
    }

    pub fn x_values(&self) -> &[f64] {
        &self.x
    }

    pub fn y_values(&self) -> &[f64] {
        &self.y
    }

    pub fn second_derivatives(&self) -> Option<&[f64]> {
        self.second_derivatives.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{CubicSpline, SplineError};

    fn built(points: &[(f64, f64)]) -> CubicSpline {
        CubicSpline::natural_from_points(points.iter().copied()).expect("spline should build")
    }

    #[test]
    fn spline_reproduces_samples_at_knots() {
        let points = [(0.5, 2.0), (1.0, 3.5), (2.5, 1.0), (4.0, 7.25), (4.5, -1.0)];
        let spline = built(&points);

        for (x, y) in points {
            let value = spline.evaluate(x).expect("evaluate");
            assert!((value - y).abs() < 1.0e-12, "x={x} expected {y} got {value}");
        }
    }

    #[test]
    fn spline_clamps_outside_sample_range() {
        let spline = built(&[(1.0, 10.0), (2.0, 30.0), (3.0, 15.0)]);

        assert_eq!(spline.evaluate(-5.0).expect("below"), 10.0);
        assert_eq!(spline.evaluate(1.0).expect("first"), 10.0);
        assert_eq!(spline.evaluate(3.0).expect("last"), 15.0);
        assert_eq!(spline.evaluate(1.0e6).expect("above"), 15.0);
    }

    #[test]
    fn natural_spline_is_exact_for_straight_lines() {
        let spline = built(&[(0.0, 1.0), (1.0, 3.0), (3.0, 7.0), (4.0, 9.0)]);

        for x in [0.25, 1.5, 2.75, 3.9] {
            let value = spline.evaluate(x).expect("evaluate");
            assert!((value - (2.0 * x + 1.0)).abs() < 1.0e-12);
        }
        let y2 = spline.second_derivatives().expect("built");
        assert!(y2.iter().all(|value| value.abs() < 1.0e-12));
    }

    #[test]
    fn two_point_spline_interpolates_linearly() {
        let spline = built(&[(1.0, 2.0), (3.0, 6.0)]);
        assert!((spline.evaluate(2.0).expect("mid") - 4.0).abs() < 1.0e-12);
    }

    #[test]
    fn clamped_boundary_slopes_match_a_quadratic() {
        let mut spline = CubicSpline::new();
        for x in [0.0, 0.5, 1.0, 1.5, 2.0] {
            spline.push_point(x, x * x).expect("push");
        }
        spline.build(0.0 + 1.0e-3, 4.0).expect("build");

        let value = spline.evaluate(1.25).expect("evaluate");
        assert!((value - 1.5625).abs() < 1.0e-3, "got {value}");
    }

    #[test]
    fn push_point_rejects_non_increasing_abscissa() {
        let mut spline = CubicSpline::new();
        spline.push_point(1.0, 1.0).expect("first");
        let error = spline.push_point(1.0, 2.0).expect_err("repeat must fail");
        assert_eq!(
            error,
            SplineError::NonIncreasingAbscissa {
                index: 1,
                previous: 1.0,
                current: 1.0,
            }
        );
        assert_eq!(spline.len(), 1);
    }

    #[test]
    fn pushing_after_build_invalidates_the_table() {
        let mut spline = built(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(spline.is_built());

        spline.push_point(2.0, 4.0).expect("push");
        assert!(!spline.is_built());
        assert_eq!(spline.evaluate(0.5), Err(SplineError::NotBuilt));
    }

    #[test]
    fn evaluate_requires_build_and_two_points() {
        let mut spline = CubicSpline::new();
        assert_eq!(
            spline.evaluate(0.0),
            Err(SplineError::InsufficientPoints { actual: 0 })
        );
        spline.push_point(0.0, 1.0).expect("push");
        assert_eq!(
            spline.build_natural(),
            Err(SplineError::InsufficientPoints { actual: 1 })
        );
        spline.push_point(1.0, 1.0).expect("push");
        assert_eq!(spline.evaluate(0.5), Err(SplineError::NotBuilt));
    }
}
