//! Shell-to-annulus projection of optically thin emission.
//!
//! A 3-D profile sampled on spherical shells is projected onto circular
//! annuli that share the same radius partition. Annulus `k` collects every
//! shell `j >= k`, weighted by the volume of the shell that falls inside the
//! annulus' cylindrical bore and by the squared shell value. The sum is
//! divided by the annulus area and the trailing background parameter is added.

use crate::common::constants::PI;
use crate::domain::{
    ExecutionMode, ParamInfo, ParameterSet, ProfileError, ProfileResult, RadiusPartition,
    UNBOUNDED,
};
use crate::models::{ProfileEvaluator, RadialModel};
use crate::numerics::CubicSpline;
use rayon::prelude::*;
use tracing::debug;

pub const BACKGROUND_PARAM: &str = "bkg";

/// Volume of a sphere of radius `r_sphere` minus a coaxial cylindrical bore of radius `r_cylinder`.
pub fn shell_ring_volume(r_sphere: f64, r_cylinder: f64) -> f64 {
    if r_cylinder < r_sphere {
        let chord = r_sphere * r_sphere - r_cylinder * r_cylinder;
        4.0 * PI / 3.0 * (chord * chord * chord).sqrt()
    } else {
        0.0
    }
}

/// Volume shared by spherical shell `shell` and cylindrical annulus `annulus`.
pub fn shell_annulus_volume(radii: &[f64], shell: usize, annulus: usize) -> f64 {
    if shell < annulus {
        return 0.0;
    }
    if shell == annulus {
        return shell_ring_volume(radii[shell + 1], radii[annulus]);
    }
    shell_ring_volume(radii[shell + 1], radii[annulus])
        - shell_ring_volume(radii[shell], radii[annulus])
        - shell_ring_volume(radii[shell + 1], radii[annulus + 1])
        + shell_ring_volume(radii[shell], radii[annulus + 1])
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellProjector {
    model: RadialModel,
    cooling_function: Option<CubicSpline>,
    cm_per_pixel: f64,
    execution_mode: ExecutionMode,
}

impl ShellProjector {
    pub fn new(model: RadialModel) -> Self {
        debug!(model = model.name(), "attached radial model to projector");
        Self {
            model,
            cooling_function: None,
            cm_per_pixel: 1.0,
            execution_mode: ExecutionMode::Serial,
        }
    }

    pub fn with_cm_per_pixel(mut self, cm_per_pixel: f64) -> Self {
        self.set_cm_per_pixel(cm_per_pixel);
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.set_execution_mode(mode);
        self
    }

    pub fn set_cm_per_pixel(&mut self, cm_per_pixel: f64) {
        self.cm_per_pixel = cm_per_pixel;
    }

    pub fn cm_per_pixel(&self) -> f64 {
        self.cm_per_pixel
    }

    pub fn set_execution_mode(&mut self, mode: ExecutionMode) {
        self.execution_mode = mode;
        self.model.set_execution_mode(mode);
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    /// Swaps the projected model, returning the previous one.
    pub fn attach_model(&mut self, mut model: RadialModel) -> RadialModel {
        debug!(model = model.name(), "attached radial model to projector");
        model.set_execution_mode(self.execution_mode);
        std::mem::replace(&mut self.model, model)
    }

    pub fn model(&self) -> &RadialModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut RadialModel {
        &mut self.model
    }

    /// Swaps the cooling function, returning the previous one.
    pub fn attach_cooling_function(&mut self, cooling_function: CubicSpline) -> Option<CubicSpline> {
        debug!(
            samples = cooling_function.len(),
            "attached cooling function to projector"
        );
        self.cooling_function.replace(cooling_function)
    }

    pub fn detach_cooling_function(&mut self) -> Option<CubicSpline> {
        self.cooling_function.take()
    }

    pub fn cooling_function(&self) -> Option<&CubicSpline> {
        self.cooling_function.as_ref()
    }

    /// The model's parameters followed by the background.
    pub fn param_infos(&self) -> Vec<ParamInfo> {
        let mut infos = self.model.param_infos();
        infos.push(ParamInfo::new(BACKGROUND_PARAM, 0.0, 0.0, UNBOUNDED));
        infos
    }

    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet::new(self.param_infos())
    }

    pub fn param_count(&self) -> usize {
        self.model.param_count() + 1
    }

    /// Per-shell values of the wrapped model, without projection or background.
    pub fn evaluate_unprojected(
        &self,
        partition: &RadiusPartition,
        params: &[f64],
    ) -> ProfileResult<Vec<f64>> {
        let model_params = self.split_params(params)?.0;
        self.model.evaluate(partition, model_params)
    }

    pub fn evaluate(&self, partition: &RadiusPartition, params: &[f64]) -> ProfileResult<Vec<f64>> {
        let (model_params, background) = self.split_params(params)?;
        let unprojected = self.model.evaluate(partition, model_params)?;
        let radii = partition.boundaries();
        let annuli = partition.shell_count();
        let volume_scale = self.cm_per_pixel * self.cm_per_pixel * self.cm_per_pixel;

        let weights = match &self.cooling_function {
            Some(spline) => (0..annuli)
                .map(|annulus| spline.evaluate(partition.midpoint(annulus)))
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![1.0; annuli],
        };

        // Inner accumulation stays sequential per annulus.
        let project = |annulus: usize| {
            let mut sum = 0.0;
            for (shell, value) in unprojected.iter().enumerate().skip(annulus) {
                let volume = shell_annulus_volume(radii, shell, annulus) * volume_scale;
                sum += value * value * weights[annulus] * volume;
            }
            sum / partition.annulus_area(annulus) + background
        };

        let projected = match self.execution_mode {
            ExecutionMode::Serial => (0..annuli).map(project).collect(),
            ExecutionMode::Parallel => (0..annuli).into_par_iter().map(project).collect(),
        };
        Ok(projected)
    }

    /// Bounds of every parameter, then the model's own predicate without the background.
    pub fn meets_constraint(&self, params: &[f64]) -> bool {
        if !self.parameter_set().within_bounds(params) {
            return false;
        }
        self.model.meets_constraint(&params[..params.len() - 1])
    }

    fn split_params<'a>(&self, params: &'a [f64]) -> ProfileResult<(&'a [f64], f64)> {
        match params.split_last() {
            Some((background, model_params)) if params.len() == self.param_count() => {
                Ok((model_params, *background))
            }
            _ => Err(ProfileError::input_validation(
                "INPUT.PARAMETER_COUNT",
                format!(
                    "projector over '{}' expects {} parameters including {BACKGROUND_PARAM}, got {}",
                    self.model.name(),
                    self.param_count(),
                    params.len()
                ),
            )),
        }
    }
}

impl ProfileEvaluator for ShellProjector {
    fn param_infos(&self) -> Vec<ParamInfo> {
        ShellProjector::param_infos(self)
    }

    fn evaluate(&self, partition: &RadiusPartition, params: &[f64]) -> ProfileResult<Vec<f64>> {
        ShellProjector::evaluate(self, partition, params)
    }

    fn meets_constraint(&self, params: &[f64]) -> bool {
        ShellProjector::meets_constraint(self, params)
    }
}
