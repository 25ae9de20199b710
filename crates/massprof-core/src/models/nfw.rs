//! Gas density in hydrostatic equilibrium with an NFW dark-matter halo.
//!
//! The model integrates `G M(r) mu m_p / (kT(r) r^2)` outward over the
//! partition boundaries and converts the cumulative integral into a density
//! through `n0 * exp(-integral) * kT0 / kT(r)`. The temperature profile is an
//! attached [`CubicSpline`] in keV over pixel radii.

use crate::common::constants::{
    GRAVITATIONAL_CONSTANT, KEV_TO_ERG, MEAN_MOLECULAR_WEIGHT, PI, PROTON_MASS,
};
use crate::domain::{
    ExecutionMode, ParamInfo, ProfileError, ProfileResult, RadiusPartition, UNBOUNDED,
};
use crate::numerics::{CubicSpline, cumulative_trapezoid};
use rayon::prelude::*;
use tracing::debug;

pub const NFW_PARAM_COUNT: usize = 3;

/// Mass enclosed within `r` for characteristic density `rho0` and scale radius `rs`.
pub fn nfw_mass_enclosed(radius: f64, rho0: f64, rs: f64) -> f64 {
    4.0 * PI * rho0 * rs * rs * rs * (((radius + rs) / rs).ln() - radius / (radius + rs))
}

/// Mean density inside `r`; the limit at the origin is `rho0`.
pub fn nfw_average_density(radius: f64, rho0: f64, rs: f64) -> f64 {
    if radius == 0.0 {
        return rho0;
    }
    nfw_mass_enclosed(radius, rho0, rs) / (4.0 * PI / 3.0 * radius * radius * radius)
}

pub fn nfw_param_infos() -> Vec<ParamInfo> {
    vec![
        ParamInfo::new("rho0", 1.0, -UNBOUNDED, UNBOUNDED),
        ParamInfo::new("rs", 100.0, -UNBOUNDED, UNBOUNDED),
        ParamInfo::new("n0", 0.01, -UNBOUNDED, UNBOUNDED),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct NfwDensityModel {
    temperature: Option<CubicSpline>,
    cm_per_pixel: f64,
    execution_mode: ExecutionMode,
}

impl Default for NfwDensityModel {
    fn default() -> Self {
        Self {
            temperature: None,
            cm_per_pixel: 1.0,
            execution_mode: ExecutionMode::Serial,
        }
    }
}

impl NfwDensityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the temperature profile, returning the previous one.
    pub fn attach_temperature(&mut self, temperature: CubicSpline) -> Option<CubicSpline> {
        debug!(samples = temperature.len(), "attached temperature profile");
        self.temperature.replace(temperature)
    }

    pub fn temperature(&self) -> Option<&CubicSpline> {
        self.temperature.as_ref()
    }

    pub fn set_cm_per_pixel(&mut self, cm_per_pixel: f64) {
        self.cm_per_pixel = cm_per_pixel;
    }

    pub fn cm_per_pixel(&self) -> f64 {
        self.cm_per_pixel
    }

    pub fn set_execution_mode(&mut self, mode: ExecutionMode) {
        self.execution_mode = mode;
    }

    /// Parameters are `rho0` (in proton masses per cm^3), `rs` (pixels) and `n0`.
    pub fn evaluate_into(
        &self,
        partition: &RadiusPartition,
        params: &[f64],
        out: &mut [f64],
    ) -> ProfileResult<()> {
        let temperature = self.temperature.as_ref().ok_or_else(|| {
            ProfileError::missing_dependency(
                "RUN.MISSING_TEMPERATURE",
                "the NFW density model needs a temperature profile attached before evaluation",
            )
        })?;

        let rho0 = params[0].abs() * PROTON_MASS;
        let rs_cm = params[1].abs() * self.cm_per_pixel;
        let n0 = params[2].abs();
        let radii = partition.boundaries();
        let cm_per_pixel = self.cm_per_pixel;

        let kt0 = temperature.evaluate(partition.midpoint(0))? * KEV_TO_ERG;
        let kt = match self.execution_mode {
            ExecutionMode::Serial => radii
                .iter()
                .map(|radius| temperature.evaluate(*radius).map(|t| t * KEV_TO_ERG))
                .collect::<Result<Vec<_>, _>>()?,
            ExecutionMode::Parallel => radii
                .par_iter()
                .map(|radius| temperature.evaluate(*radius).map(|t| t * KEV_TO_ERG))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let integrand = |(radius, kt): (&f64, &f64)| {
            let r_cm = radius * cm_per_pixel;
            if r_cm == 0.0 || *kt <= 0.0 {
                return 0.0;
            }
            let mass = nfw_mass_enclosed(r_cm, rho0, rs_cm);
            GRAVITATIONAL_CONSTANT * mass * MEAN_MOLECULAR_WEIGHT * PROTON_MASS / kt / (r_cm * r_cm)
        };
        let y: Vec<f64> = match self.execution_mode {
            ExecutionMode::Serial => radii.iter().zip(&kt).map(integrand).collect(),
            ExecutionMode::Parallel => radii.par_iter().zip(&kt).map(integrand).collect(),
        };

        let radii_cm: Vec<f64> = radii.iter().map(|radius| radius * cm_per_pixel).collect();
        // Sequential: every density below depends on the running integral.
        let cumulative = cumulative_trapezoid(&radii_cm, &y).ok_or_else(|| {
            ProfileError::internal(
                "RUN.NFW_INTEGRAND",
                "hydrostatic integrand does not match the partition boundaries",
            )
        })?;

        let density = |(index, slot): (usize, &mut f64)| {
            *slot = if kt[index] > 0.0 {
                n0 * (-cumulative[index + 1]).exp() * kt0 / kt[index]
            } else {
                0.0
            };
        };
        match self.execution_mode {
            ExecutionMode::Serial => out.iter_mut().enumerate().for_each(density),
            ExecutionMode::Parallel => out.par_iter_mut().enumerate().for_each(density),
        }
        Ok(())
    }
}
