use massprof_core::numerics::{CubicSpline, SplineError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NumericFixtures {
    spline_cases: Vec<SplineCase>,
}

#[derive(Debug, Deserialize)]
struct SplineCase {
    id: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl SplineCase {
    fn natural(&self) -> CubicSpline {
        CubicSpline::natural_from_points(self.x.iter().copied().zip(self.y.iter().copied()))
            .unwrap_or_else(|error| panic!("fixture '{}' should build: {error}", self.id))
    }
}

fn load_cases() -> Vec<SplineCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/numeric_cases.json");
    let source = fs::read_to_string(&path).expect("fixture file should be readable");
    let fixtures: NumericFixtures =
        serde_json::from_str(&source).expect("fixture file should parse");
    fixtures.spline_cases
}

fn assert_close(actual: f64, expected: f64, context: &str) {
    let tolerance = 1.0e-10 * expected.abs().max(1.0e-30);
    assert!(
        (actual - expected).abs() <= tolerance,
        "{context}: expected {expected}, got {actual}"
    );
}

#[test]
fn fixture_splines_reproduce_every_knot() {
    for case in load_cases() {
        let spline = case.natural();
        for (x, y) in case.x.iter().zip(&case.y) {
            let value = spline.evaluate(*x).expect("built spline evaluates");
            assert_close(value, *y, &format!("fixture '{}' at x={x}", case.id));
        }
    }
}

#[test]
fn fixture_splines_clamp_outside_the_sampled_range() {
    for case in load_cases() {
        let spline = case.natural();
        let first = case.y[0];
        let last = case.y[case.y.len() - 1];
        let x_min = case.x[0];
        let x_max = case.x[case.x.len() - 1];

        for offset in [1.0e-9, 1.0, 1.0e6] {
            assert_eq!(spline.evaluate(x_min - offset).expect("below"), first, "{}", case.id);
            assert_eq!(spline.evaluate(x_max + offset).expect("above"), last, "{}", case.id);
        }
    }
}

#[test]
fn fixture_natural_splines_have_zero_end_curvature() {
    for case in load_cases() {
        let spline = case.natural();
        let y2 = spline
            .second_derivatives()
            .expect("natural spline stores second derivatives");
        assert_eq!(y2.len(), case.x.len(), "{}", case.id);
        assert_eq!(y2[0], 0.0, "{}", case.id);
        assert_eq!(y2[y2.len() - 1], 0.0, "{}", case.id);
    }
}

#[test]
fn linear_samples_are_reproduced_between_knots() {
    let spline = CubicSpline::natural_from_points((0..6).map(|i| {
        let x = f64::from(i) * 1.5;
        (x, 2.0 * x - 3.0)
    }))
    .expect("linear spline");

    for step in 0..=30 {
        let x = f64::from(step) * 0.25;
        let value = spline.evaluate(x).expect("evaluate");
        assert!((value - (2.0 * x - 3.0)).abs() < 1.0e-12, "x={x} value={value}");
    }
}

#[test]
fn clamped_end_slopes_are_honored_for_quadratic_samples() {
    let mut spline = CubicSpline::new();
    for i in 0..8 {
        let x = f64::from(i);
        spline.push_point(x, (x + 1.0) * (x + 1.0)).expect("push");
    }
    spline.build(2.0, 16.0).expect("clamped build");

    for x in [0.25, 3.5, 6.9] {
        let value = spline.evaluate(x).expect("evaluate");
        let expected = (x + 1.0) * (x + 1.0);
        assert!((value - expected).abs() < 1.0e-10, "x={x} value={value}");
    }
}

#[test]
fn unbuilt_and_undersized_splines_refuse_to_evaluate() {
    let mut spline = CubicSpline::new();
    assert_eq!(
        spline.evaluate(1.0),
        Err(SplineError::InsufficientPoints { actual: 0 })
    );

    spline.push_point(0.0, 1.0).expect("push");
    spline.push_point(1.0, 2.0).expect("push");
    assert!(!spline.is_built());
    assert_eq!(spline.evaluate(0.5), Err(SplineError::NotBuilt));

    spline.build_natural().expect("build");
    assert!((spline.evaluate(0.5).expect("evaluate") - 1.5).abs() < 1.0e-12);
}

#[test]
fn duplicate_abscissae_are_rejected() {
    let error = CubicSpline::natural_from_points([(0.0, 1.0), (1.0, 2.0), (1.0, 3.0)])
        .expect_err("duplicate x");
    assert_eq!(
        error,
        SplineError::NonIncreasingAbscissa {
            index: 2,
            previous: 1.0,
            current: 1.0,
        }
    );
}
