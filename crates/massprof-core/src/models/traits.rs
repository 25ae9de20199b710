use super::RadialModel;
use crate::domain::{ParamInfo, ProfileResult, RadiusPartition};

/// Anything an objective can evaluate per iteration: a bare radial model or a projector.
pub trait ProfileEvaluator {
    fn param_infos(&self) -> Vec<ParamInfo>;

    fn evaluate(&self, partition: &RadiusPartition, params: &[f64]) -> ProfileResult<Vec<f64>>;

    fn meets_constraint(&self, params: &[f64]) -> bool;
}

impl ProfileEvaluator for RadialModel {
    fn param_infos(&self) -> Vec<ParamInfo> {
        RadialModel::param_infos(self)
    }

    fn evaluate(&self, partition: &RadiusPartition, params: &[f64]) -> ProfileResult<Vec<f64>> {
        RadialModel::evaluate(self, partition, params)
    }

    fn meets_constraint(&self, params: &[f64]) -> bool {
        RadialModel::meets_constraint(self, params)
    }
}
