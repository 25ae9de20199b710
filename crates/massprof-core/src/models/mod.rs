pub mod beta;
pub mod dbeta;
pub mod nfw;
pub mod traits;

pub use beta::{beta_density, beta_model_value};
pub use dbeta::{DoubleBetaShape, double_beta_density};
pub use nfw::{NfwDensityModel, nfw_average_density, nfw_mass_enclosed};
pub use traits::ProfileEvaluator;

use crate::domain::{
    ExecutionMode, ParamInfo, ParameterSet, ProfileError, ProfileResult, RadiusPartition,
};

/// Per-shell 3-D radial profiles.
///
/// Beta-family variants evaluate at shell midpoints. The NFW density variant
/// integrates over the partition boundaries and needs an attached temperature
/// profile.
#[derive(Debug, Clone, PartialEq)]
pub enum RadialModel {
    Beta,
    DoubleBeta { ordered_core_radii: bool },
    TiedDoubleBeta,
    NfwDensity(NfwDensityModel),
}

impl RadialModel {
    pub fn double_beta() -> Self {
        Self::DoubleBeta {
            ordered_core_radii: false,
        }
    }

    /// Double beta whose feasibility predicate requires `rc2 > rc1`.
    pub fn ordered_double_beta() -> Self {
        Self::DoubleBeta {
            ordered_core_radii: true,
        }
    }

    pub fn nfw_density() -> Self {
        Self::NfwDensity(NfwDensityModel::new())
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Beta => "beta",
            Self::DoubleBeta {
                ordered_core_radii: false,
            } => "dbeta",
            Self::DoubleBeta {
                ordered_core_radii: true,
            } => "dbeta_ordered",
            Self::TiedDoubleBeta => "dbeta_tied",
            Self::NfwDensity(_) => "nfw_ne",
        }
    }

    pub fn param_infos(&self) -> Vec<ParamInfo> {
        match self {
            Self::Beta => beta::beta_param_infos(),
            Self::DoubleBeta { .. } => dbeta::double_beta_param_infos(),
            Self::TiedDoubleBeta => dbeta::tied_double_beta_param_infos(),
            Self::NfwDensity(_) => nfw::nfw_param_infos(),
        }
    }

    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet::new(self.param_infos())
    }

    pub const fn param_count(&self) -> usize {
        match self {
            Self::Beta => beta::BETA_PARAM_COUNT,
            Self::DoubleBeta { .. } => dbeta::DOUBLE_BETA_PARAM_COUNT,
            Self::TiedDoubleBeta => dbeta::TIED_DOUBLE_BETA_PARAM_COUNT,
            Self::NfwDensity(_) => nfw::NFW_PARAM_COUNT,
        }
    }

    pub fn as_nfw_mut(&mut self) -> Option<&mut NfwDensityModel> {
        match self {
            Self::NfwDensity(model) => Some(model),
            _ => None,
        }
    }

    pub fn set_execution_mode(&mut self, mode: ExecutionMode) {
        if let Self::NfwDensity(model) = self {
            model.set_execution_mode(mode);
        }
    }

    pub fn evaluate(&self, partition: &RadiusPartition, params: &[f64]) -> ProfileResult<Vec<f64>> {
        let mut out = vec![0.0; partition.shell_count()];
        self.evaluate_into(partition, params, &mut out)?;
        Ok(out)
    }

    /// Writes one value per shell into `out`, which must hold `shell_count()` slots.
    pub fn evaluate_into(
        &self,
        partition: &RadiusPartition,
        params: &[f64],
        out: &mut [f64],
    ) -> ProfileResult<()> {
        self.check_param_count(params)?;
        if out.len() != partition.shell_count() {
            return Err(ProfileError::internal(
                "SYS.MODEL_BUFFER",
                format!(
                    "model output buffer has {} slots for {} shells",
                    out.len(),
                    partition.shell_count()
                ),
            ));
        }

        match self {
            Self::Beta => beta::evaluate_beta(&partition.midpoints(), params, out),
            Self::DoubleBeta { .. } => dbeta::evaluate_double_beta(
                &partition.midpoints(),
                &DoubleBetaShape::untied(params),
                out,
            ),
            Self::TiedDoubleBeta => dbeta::evaluate_double_beta(
                &partition.midpoints(),
                &DoubleBetaShape::tied(params),
                out,
            ),
            Self::NfwDensity(model) => model.evaluate_into(partition, params, out)?,
        }
        Ok(())
    }

    /// Model-specific feasibility over the model's own parameters.
    pub fn meets_constraint(&self, params: &[f64]) -> bool {
        match self {
            Self::DoubleBeta {
                ordered_core_radii: true,
            } => {
                params.len() == dbeta::DOUBLE_BETA_PARAM_COUNT
                    && DoubleBetaShape::untied(params).core_radii_ordered()
            }
            _ => true,
        }
    }

    /// Closed-form density at a single radius, used for derived quantities.
    pub fn density_at(&self, radius: f64, params: &[f64]) -> ProfileResult<f64> {
        self.check_param_count(params)?;
        match self {
            Self::Beta => Ok(beta_density(radius, params[0], params[1], params[2])),
            Self::DoubleBeta { .. } => Ok(double_beta_density(
                radius,
                &DoubleBetaShape::untied(params),
            )),
            Self::TiedDoubleBeta => Ok(double_beta_density(
                radius,
                &DoubleBetaShape::tied(params),
            )),
            Self::NfwDensity(_) => Err(ProfileError::input_validation(
                "INPUT.MODEL_POINT_DENSITY",
                "the NFW density model has no closed-form point density",
            )),
        }
    }

    fn check_param_count(&self, params: &[f64]) -> ProfileResult<()> {
        if params.len() != self.param_count() {
            return Err(ProfileError::input_validation(
                "INPUT.PARAMETER_COUNT",
                format!(
                    "model '{}' expects {} parameters, got {}",
                    self.name(),
                    self.param_count(),
                    params.len()
                ),
            ));
        }
        Ok(())
    }
}
