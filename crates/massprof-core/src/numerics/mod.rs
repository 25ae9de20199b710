pub mod spline;

pub use spline::{CubicSpline, SplineError};

/// Running compensated sum: `out[0] = 0`, `out[i] = terms[0] + ... + terms[i - 1]`.
///
/// The returned vector is one element longer than `terms`.
pub fn prefix_sum(terms: &[f64]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(terms.len() + 1);
    cumulative.push(0.0);
    let (mut total, mut lost) = (0.0_f64, 0.0_f64);
    for &term in terms {
        let adjusted = term - lost;
        let next = total + adjusted;
        lost = (next - total) - adjusted;
        total = next;
        cumulative.push(total);
    }
    cumulative
}

/// Trapezoid terms `(y[i] + y[i + 1]) / 2 * (x[i + 1] - x[i])`.
pub fn trapezoid_terms(x: &[f64], y: &[f64]) -> Option<Vec<f64>> {
    if x.len() != y.len() {
        return None;
    }

    Some(
        x.windows(2)
            .zip(y.windows(2))
            .map(|(xs, ys)| (ys[0] + ys[1]) / 2.0 * (xs[1] - xs[0]))
            .collect(),
    )
}

pub fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Option<Vec<f64>> {
    if x.is_empty() {
        return None;
    }
    trapezoid_terms(x, y).map(|terms| prefix_sum(&terms))
}

/// Geometric grid `start, start*(1+step), ...` for every point strictly below `end`.
pub fn geometric_grid(start: f64, end: f64, relative_step: f64) -> Option<Vec<f64>> {
    if !(start > 0.0) || !(relative_step > 0.0) || !end.is_finite() {
        return None;
    }

    let factor = 1.0 + relative_step;
    let mut grid = Vec::new();
    let mut value = start;
    while value < end {
        grid.push(value);
        value *= factor;
    }
    Some(grid)
}

/// Uniform steps `0, step, 2*step, ...` strictly below `end`.
pub fn uniform_grid(step: f64, end: f64) -> Option<Vec<f64>> {
    if !(step > 0.0) || !end.is_finite() {
        return None;
    }

    let mut grid = Vec::new();
    let mut index = 0_usize;
    loop {
        let value = step * index as f64;
        if value >= end {
            break;
        }
        grid.push(value);
        index += 1;
    }
    Some(grid)
}

/// Finite-difference slope of `ln y` against `ln x` between two samples.
pub fn log_slope(x0: f64, x1: f64, y0: f64, y1: f64) -> Option<f64> {
    if x0 <= 0.0 || x1 <= 0.0 || y0 <= 0.0 || y1 <= 0.0 {
        return None;
    }
    let dlnx = x1.ln() - x0.ln();
    if dlnx == 0.0 {
        return None;
    }
    Some((y1.ln() - y0.ln()) / dlnx)
}
