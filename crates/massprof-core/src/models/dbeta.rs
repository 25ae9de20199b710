use super::beta::beta_density;
use crate::domain::ParamInfo;

pub const DOUBLE_BETA_PARAM_COUNT: usize = 6;
pub const TIED_DOUBLE_BETA_PARAM_COUNT: usize = 5;

/// Two beta components; the tied form shares one slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleBetaShape {
    pub n01: f64,
    pub beta1: f64,
    pub rc1: f64,
    pub n02: f64,
    pub beta2: f64,
    pub rc2: f64,
}

impl DoubleBetaShape {
    /// Layout `n01, beta1, rc1, n02, beta2, rc2`.
    pub fn untied(params: &[f64]) -> Self {
        Self {
            n01: params[0],
            beta1: params[1],
            rc1: params[2],
            n02: params[3],
            beta2: params[4],
            rc2: params[5],
        }
    }

    /// Layout `n01, rc1, n02, rc2, beta`.
    pub fn tied(params: &[f64]) -> Self {
        Self {
            n01: params[0],
            beta1: params[4],
            rc1: params[1],
            n02: params[2],
            beta2: params[4],
            rc2: params[3],
        }
    }

    pub fn core_radii_ordered(&self) -> bool {
        self.rc2 > self.rc1
    }
}

pub fn double_beta_density(radius: f64, shape: &DoubleBetaShape) -> f64 {
    beta_density(radius, shape.n01, shape.beta1, shape.rc1)
        + beta_density(radius, shape.n02, shape.beta2, shape.rc2)
}

pub fn double_beta_param_infos() -> Vec<ParamInfo> {
    vec![
        ParamInfo::unbounded("n01", 1.0),
        ParamInfo::unbounded("beta1", 0.66),
        ParamInfo::unbounded("rc1", 100.0),
        ParamInfo::unbounded("n02", 1.0),
        ParamInfo::unbounded("beta2", 0.67),
        ParamInfo::unbounded("rc2", 110.0),
    ]
}

pub fn tied_double_beta_param_infos() -> Vec<ParamInfo> {
    vec![
        ParamInfo::unbounded("n01", 1.0),
        ParamInfo::unbounded("rc1", 100.0),
        ParamInfo::unbounded("n02", 1.0),
        ParamInfo::unbounded("rc2", 110.0),
        ParamInfo::unbounded("beta", 0.67),
    ]
}

pub fn evaluate_double_beta(midpoints: &[f64], shape: &DoubleBetaShape, out: &mut [f64]) {
    for (slot, radius) in out.iter_mut().zip(midpoints) {
        *slot = double_beta_density(*radius, shape);
    }
}

#[cfg(test)]
mod tests {
    use super::{DoubleBetaShape, double_beta_density};
    use crate::models::beta::beta_density;

    #[test]
    fn double_beta_sums_two_components() {
        let shape = DoubleBetaShape::untied(&[1.0, 0.6, 20.0, 0.5, 0.9, 80.0]);
        let expected = beta_density(40.0, 1.0, 0.6, 20.0) + beta_density(40.0, 0.5, 0.9, 80.0);
        assert!((double_beta_density(40.0, &shape) - expected).abs() < 1.0e-15);
    }

    #[test]
    fn double_beta_takes_absolute_slopes() {
        let positive = DoubleBetaShape::untied(&[1.0, 0.6, 20.0, 0.5, 0.9, 80.0]);
        let negative = DoubleBetaShape::untied(&[-1.0, -0.6, 20.0, -0.5, -0.9, 80.0]);
        assert_eq!(
            double_beta_density(35.0, &positive),
            double_beta_density(35.0, &negative)
        );
    }

    #[test]
    fn tied_layout_shares_the_slope() {
        let shape = DoubleBetaShape::tied(&[1.0, 10.0, 2.0, 30.0, 0.8]);
        assert_eq!(shape.beta1, 0.8);
        assert_eq!(shape.beta2, 0.8);
        assert_eq!(shape.rc1, 10.0);
        assert_eq!(shape.rc2, 30.0);
        assert!(shape.core_radii_ordered());
    }
}
