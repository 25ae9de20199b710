use super::CliError;
use anyhow::Context;
use massprof_core::common::constants::KPC;
use massprof_core::common::{FitConfig, parse_config};
use massprof_core::domain::{ParameterSet, ProfileResult};
use massprof_core::fitting::ObservedProfile;
use massprof_core::io::{
    assemble_observed_profile, read_brightness_table, read_radius_table, read_spline_table,
};
use massprof_core::projector::ShellProjector;
use massprof_core::report::write_json_report;
use massprof_core::{CubicSpline, ExecutionMode};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads and parses a fit configuration; relative data paths resolve against
/// the configuration's directory.
pub(super) fn load_fit_config(path: &Path) -> Result<FitConfig, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration '{}'", path.display()))?;
    let mut config = parse_config(&source).map_err(CliError::Compute)?;
    config.resolve_paths_against(path.parent().unwrap_or_else(|| Path::new(".")));
    debug!(path = %path.display(), params = config.params.len(), "loaded configuration");
    Ok(config)
}

pub(super) fn load_observed_profile(config: &FitConfig) -> ProfileResult<ObservedProfile> {
    let radii = read_radius_table(config.radius_path()?)?;
    let (values, errors) = read_brightness_table(config.sbp_path()?)?;
    assemble_observed_profile(radii, values, errors, config.rmin_pixels()?)
}

/// Projector carrying the configured model with the parameter set it reads.
pub(super) struct ConfiguredProjector {
    pub(super) projector: ShellProjector,
    pub(super) parameters: ParameterSet,
}

impl ConfiguredProjector {
    pub(super) fn values(&self) -> Vec<f64> {
        self.parameters.values()
    }

    /// Values without the trailing background.
    pub(super) fn model_values(&self) -> Vec<f64> {
        let mut values = self.parameters.values();
        values.pop();
        values
    }
}

/// Builds the projector for `config`.
///
/// The cooling function is read when `cooling_cutoff` is given and limited to
/// that radius. The NFW model additionally gets the temperature profile and
/// the pixel scale.
pub(super) fn configure_projector(
    config: &FitConfig,
    cooling_cutoff: Option<f64>,
    execution_mode: ExecutionMode,
) -> ProfileResult<ConfiguredProjector> {
    let cm_per_pixel = config.require_cm_per_pixel()?;
    let mut model = config.select_density_model()?;
    if let Some(nfw) = model.as_nfw_mut() {
        nfw.attach_temperature(temperature_spline(config)?);
        nfw.set_cm_per_pixel(cm_per_pixel);
    }

    let mut projector = ShellProjector::new(model)
        .with_cm_per_pixel(cm_per_pixel)
        .with_execution_mode(execution_mode);
    if let Some(cutoff) = cooling_cutoff {
        projector.attach_cooling_function(read_spline_table(
            config.cfunc_path()?,
            1.0,
            Some(cutoff),
        )?);
    }

    let mut parameters = projector.parameter_set();
    config.apply_parameters(&mut parameters)?;
    Ok(ConfiguredProjector {
        projector,
        parameters,
    })
}

/// Temperature profile (keV) over pixel radii.
pub(super) fn temperature_spline(config: &FitConfig) -> ProfileResult<CubicSpline> {
    read_spline_table(config.temperature_path()?, 1.0, None)
}

pub(super) fn kpc_to_pixels(radius_kpc: f64, cm_per_pixel: f64) -> f64 {
    radius_kpc * KPC / cm_per_pixel
}

pub(super) fn pixels_to_kpc(radius_pixel: f64, cm_per_pixel: f64) -> f64 {
    radius_pixel * cm_per_pixel / KPC
}

pub(super) fn write_report_if_requested<T: Serialize>(
    report_path: Option<&Path>,
    report: &T,
) -> Result<(), CliError> {
    let Some(path) = report_path else {
        return Ok(());
    };
    write_json_report(path, report).map_err(|error| CliError::Compute(error.into()))?;
    println!("JSON report: {}", path.display());
    Ok(())
}

pub(super) fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.6e}"))
}
