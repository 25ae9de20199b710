use crate::domain::{ParamInfo, UNBOUNDED};

pub const BETA_PARAM_COUNT: usize = 3;

/// `|n0| * (1 + (r/rc)^2)^(-1.5 * beta)` with `beta` taken as given.
///
/// A zero core radius yields `n0` at the origin and zero elsewhere.
pub fn beta_model_value(radius: f64, n0: f64, beta: f64, rc: f64) -> f64 {
    let scaled = scaled_radius_squared(radius, rc);
    n0.abs() * (1.0 + scaled).powf(-1.5 * beta)
}

/// Beta profile with both `n0` and `beta` taken by absolute value.
pub fn beta_density(radius: f64, n0: f64, beta: f64, rc: f64) -> f64 {
    beta_model_value(radius, n0, beta.abs(), rc)
}

pub(crate) fn scaled_radius_squared(radius: f64, rc: f64) -> f64 {
    if rc == 0.0 {
        if radius == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        let ratio = radius / rc;
        ratio * ratio
    }
}

pub fn beta_param_infos() -> Vec<ParamInfo> {
    vec![
        ParamInfo::new("n0", 1.0, 0.0, UNBOUNDED),
        ParamInfo::new("beta", 0.66, 0.0, UNBOUNDED),
        ParamInfo::new("rc", 100.0, 0.0, UNBOUNDED),
    ]
}

pub fn evaluate_beta(midpoints: &[f64], params: &[f64], out: &mut [f64]) {
    let (n0, beta, rc) = (params[0], params[1], params[2]);
    for (slot, radius) in out.iter_mut().zip(midpoints) {
        *slot = beta_model_value(*radius, n0, beta, rc);
    }
}
