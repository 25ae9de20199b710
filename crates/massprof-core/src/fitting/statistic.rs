use crate::domain::{ParameterSet, ProfileError, ProfileResult, RadiusPartition};
use crate::models::ProfileEvaluator;
use tracing::{info, trace};

/// Objective value returned for parameter vectors the optimizer must reject.
pub const INFEASIBLE_STATISTIC: f64 = 1.0e99;
pub const DEFAULT_REPORT_EVERY: usize = 100;

/// Annulus-binned observations sharing one radius partition.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedProfile {
    partition: RadiusPartition,
    values: Vec<f64>,
    errors: Vec<f64>,
}

impl ObservedProfile {
    pub fn new(
        partition: RadiusPartition,
        values: Vec<f64>,
        errors: Vec<f64>,
    ) -> ProfileResult<Self> {
        let annuli = partition.shell_count();
        if values.len() != annuli || errors.len() != annuli {
            return Err(ProfileError::input_validation(
                "INPUT.OBSERVED_PROFILE",
                format!(
                    "observed profile needs one value and error per annulus: {annuli} annuli, {} values, {} errors",
                    values.len(),
                    errors.len()
                ),
            ));
        }
        Ok(Self {
            partition,
            values,
            errors,
        })
    }

    pub fn partition(&self) -> &RadiusPartition {
        &self.partition
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(model - value) / error` per annulus; `None` where the error is not positive.
    pub fn residuals(&self, model_values: &[f64]) -> Vec<Option<f64>> {
        self.values
            .iter()
            .zip(&self.errors)
            .zip(model_values)
            .map(|((value, error), model)| (*error > 0.0).then(|| (model - value) / error))
            .collect()
    }
}

/// One objective evaluation as seen by a [`FitObserver`].
#[derive(Debug, Clone, Copy)]
pub struct EvaluationEvent<'a> {
    pub evaluation: usize,
    pub statistic: f64,
    pub params: &'a [f64],
    pub model_values: &'a [f64],
}

pub trait FitObserver {
    fn on_evaluation(&mut self, event: &EvaluationEvent<'_>);
}

/// Logs the statistic and parameter vector through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FitObserver for TracingObserver {
    fn on_evaluation(&mut self, event: &EvaluationEvent<'_>) {
        info!(
            evaluation = event.evaluation,
            statistic = event.statistic,
            params = ?event.params,
            "objective progress"
        );
    }
}

/// Chi-square of a profile evaluator against observed data.
pub struct ChiSquare<'a, M: ProfileEvaluator> {
    model: &'a M,
    data: &'a ObservedProfile,
    enforce_bounds: bool,
    configured_bounds: Option<ParameterSet>,
    observer: Option<Box<dyn FitObserver + 'a>>,
    report_every: usize,
    evaluations: usize,
}

impl<'a, M: ProfileEvaluator> ChiSquare<'a, M> {
    pub fn new(model: &'a M, data: &'a ObservedProfile) -> Self {
        Self {
            model,
            data,
            enforce_bounds: true,
            configured_bounds: None,
            observer: None,
            report_every: DEFAULT_REPORT_EVERY,
            evaluations: 0,
        }
    }

    pub fn with_bounds_enforced(mut self, enforce: bool) -> Self {
        self.enforce_bounds = enforce;
        self
    }

    /// Also rejects vectors outside the bounds of `parameters`, typically a
    /// configured copy of the evaluator's own parameter set.
    pub fn with_configured_bounds(mut self, parameters: ParameterSet) -> Self {
        self.configured_bounds = Some(parameters);
        self
    }

    /// Calls `observer` on every `every`-th evaluation (at least every one).
    pub fn with_observer(mut self, observer: Box<dyn FitObserver + 'a>, every: usize) -> Self {
        self.observer = Some(observer);
        self.report_every = every.max(1);
        self
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn evaluate(&mut self, params: &[f64]) -> ProfileResult<f64> {
        self.evaluations += 1;
        if self.enforce_bounds && !self.feasible(params) {
            trace!(evaluation = self.evaluations, "parameters rejected by constraints");
            return Ok(INFEASIBLE_STATISTIC);
        }

        let model_values = self.model.evaluate(self.data.partition(), params)?;
        let statistic = self.sum(&model_values);
        trace!(evaluation = self.evaluations, statistic, "objective evaluated");

        if self.evaluations % self.report_every == 0 {
            if let Some(observer) = self.observer.as_mut() {
                observer.on_evaluation(&EvaluationEvent {
                    evaluation: self.evaluations,
                    statistic,
                    params,
                    model_values: &model_values,
                });
            }
        }
        Ok(statistic)
    }

    fn feasible(&self, params: &[f64]) -> bool {
        self.configured_bounds
            .as_ref()
            .is_none_or(|bounds| bounds.within_bounds(params))
            && self.model.meets_constraint(params)
    }

    fn sum(&self, model_values: &[f64]) -> f64 {
        if model_values.iter().any(|value| !value.is_finite()) {
            return INFEASIBLE_STATISTIC;
        }
        let total: f64 = self
            .data
            .residuals(model_values)
            .into_iter()
            .flatten()
            .map(|chi| chi * chi)
            .sum();
        if total.is_finite() {
            total
        } else {
            INFEASIBLE_STATISTIC
        }
    }
}

/// Statistic per degree of freedom; `None` when there are no degrees of freedom left.
pub fn reduced_chi_square(statistic: f64, points: usize, free_params: usize) -> Option<f64> {
    if points <= free_params {
        return None;
    }
    Some(statistic / (points - free_params) as f64)
}

#[cfg(test)]
mod tests {
    use super::{
        ChiSquare, EvaluationEvent, FitObserver, INFEASIBLE_STATISTIC, ObservedProfile,
        reduced_chi_square,
    };
    use crate::domain::RadiusPartition;
    use crate::models::RadialModel;
    use crate::projector::ShellProjector;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn observed(values: Vec<f64>, errors: Vec<f64>) -> ObservedProfile {
        let partition = RadiusPartition::new(vec![0.0, 1.0, 2.0, 3.0]).expect("partition");
        ObservedProfile::new(partition, values, errors).expect("observed")
    }

    struct Recorder(Rc<RefCell<Vec<(usize, f64)>>>);

    impl FitObserver for Recorder {
        fn on_evaluation(&mut self, event: &EvaluationEvent<'_>) {
            self.0.borrow_mut().push((event.evaluation, event.statistic));
        }
    }

    #[test]
    fn perfect_model_has_zero_statistic() {
        let model = RadialModel::Beta;
        let data = observed(vec![2.0, 2.0, 2.0], vec![0.1, 0.1, 0.1]);
        let mut objective = ChiSquare::new(&model, &data);
        assert_eq!(objective.evaluate(&[2.0, 0.0, 10.0]).expect("chi2"), 0.0);
    }

    #[test]
    fn rows_without_positive_error_are_skipped() {
        let model = RadialModel::Beta;
        let data = observed(vec![1.0, 0.0, 1.0], vec![0.5, 0.0, -1.0]);
        let mut objective = ChiSquare::new(&model, &data);
        let statistic = objective.evaluate(&[2.0, 0.0, 10.0]).expect("chi2");
        assert!((statistic - 4.0).abs() < 1.0e-12);
    }

    #[test]
    fn infeasible_parameters_return_the_sentinel() {
        let projector = ShellProjector::new(RadialModel::ordered_double_beta());
        let data = observed(vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]);
        let params = [1.0, 0.7, 20.0, 1.0, 0.7, 10.0, 0.0];

        let mut enforced = ChiSquare::new(&projector, &data);
        assert_eq!(enforced.evaluate(&params).expect("chi2"), INFEASIBLE_STATISTIC);

        let mut relaxed = ChiSquare::new(&projector, &data).with_bounds_enforced(false);
        assert!(relaxed.evaluate(&params).expect("chi2") < INFEASIBLE_STATISTIC);
    }

    #[test]
    fn configured_bounds_narrow_the_feasible_region() {
        let projector = ShellProjector::new(RadialModel::Beta);
        let data = observed(vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]);
        let mut bounds = projector.parameter_set();
        bounds.set_bounds("beta", 0.3, 1.4).expect("beta bounds");

        let mut objective = ChiSquare::new(&projector, &data).with_configured_bounds(bounds);
        assert_eq!(
            objective.evaluate(&[1.0, 2.0, 10.0, 0.0]).expect("chi2"),
            INFEASIBLE_STATISTIC
        );
        assert!(objective.evaluate(&[1.0, 0.7, 10.0, 0.0]).expect("chi2") < INFEASIBLE_STATISTIC);
    }

    #[test]
    fn non_finite_model_values_return_the_sentinel() {
        let model = RadialModel::Beta;
        let data = observed(vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]);
        let mut objective = ChiSquare::new(&model, &data).with_bounds_enforced(false);
        // Negative slope with zero core radius diverges away from the origin.
        let statistic = objective.evaluate(&[1.0, -1.0, 0.0]).expect("chi2");
        assert_eq!(statistic, INFEASIBLE_STATISTIC);
    }

    #[test]
    fn missing_dependencies_propagate_as_errors() {
        let projector = ShellProjector::new(RadialModel::nfw_density());
        let data = observed(vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]);
        let mut objective = ChiSquare::new(&projector, &data);
        let error = objective
            .evaluate(&[1.0, 100.0, 0.01, 0.0])
            .expect_err("temperature missing");
        assert_eq!(error.placeholder(), "RUN.MISSING_TEMPERATURE");
    }

    #[test]
    fn observer_runs_every_nth_evaluation() {
        let model = RadialModel::Beta;
        let data = observed(vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]);
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut objective = ChiSquare::new(&model, &data)
            .with_observer(Box::new(Recorder(Rc::clone(&events))), 3);

        for _ in 0..7 {
            objective.evaluate(&[1.0, 0.0, 10.0]).expect("chi2");
        }
        assert_eq!(objective.evaluations(), 7);
        assert_eq!(*events.borrow(), vec![(3, 0.0), (6, 0.0)]);
    }

    #[test]
    fn observed_profile_requires_one_row_per_annulus() {
        let partition = RadiusPartition::new(vec![0.0, 1.0, 2.0]).expect("partition");
        let error = ObservedProfile::new(partition, vec![1.0], vec![1.0])
            .expect_err("length mismatch");
        assert_eq!(error.placeholder(), "INPUT.OBSERVED_PROFILE");
    }

    #[test]
    fn reduced_statistic_needs_degrees_of_freedom() {
        assert_eq!(reduced_chi_square(12.0, 10, 4), Some(2.0));
        assert_eq!(reduced_chi_square(12.0, 4, 4), None);
    }
}
