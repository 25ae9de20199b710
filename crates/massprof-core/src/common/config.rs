//! Line-oriented fit configuration.
//!
//! Each non-empty line is `key value...`. Path and scalar keys are reserved;
//! every other key carrying at least one number becomes a parameter entry
//! `name value [bound_a bound_b]`.

use super::constants::KPC;
use crate::domain::{ParameterSet, ProfileError, ProfileResult};
use crate::models::RadialModel;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `rmin_kpc` when the key is absent; negative, so no annulus is cut.
pub const UNSET_RMIN_KPC: f64 = -1.0;
pub const SLOPE_PARAMS: [&str; 3] = ["beta", "beta1", "beta2"];
pub const DEFAULT_SLOPE: f64 = 0.7;
pub const DEFAULT_SLOPE_BOUNDS: (f64, f64) = (0.3, 1.4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChoice {
    Beta,
    DoubleBeta,
    OrderedDoubleBeta,
    Nfw,
}

impl ModelChoice {
    pub fn parse(token: &str) -> ProfileResult<Self> {
        match token {
            "beta" => Ok(Self::Beta),
            "dbeta" => Ok(Self::DoubleBeta),
            "dbeta_ordered" => Ok(Self::OrderedDoubleBeta),
            "nfw" => Ok(Self::Nfw),
            other => Err(ProfileError::input_validation(
                "INPUT.CONFIG_MODEL",
                format!("unknown model '{other}'; expected beta, dbeta, dbeta_ordered or nfw"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamEntry {
    pub value: f64,
    pub bounds: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitConfig {
    pub radius_file: Option<PathBuf>,
    pub sbp_file: Option<PathBuf>,
    pub cfunc_file: Option<PathBuf>,
    pub temperature_file: Option<PathBuf>,
    pub z: Option<f64>,
    pub cm_per_pixel: Option<f64>,
    pub rmin_pixel: Option<f64>,
    pub rmin_kpc: Option<f64>,
    pub model: Option<ModelChoice>,
    pub params: BTreeMap<String, ParamEntry>,
}

pub fn parse_config(source: &str) -> ProfileResult<FitConfig> {
    let mut config = FitConfig::default();

    for (line_index, raw_line) in source.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or_default();
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };
        let line_number = line_index + 1;
        let rest: Vec<&str> = tokens.collect();

        match key {
            "radius_file" => config.radius_file = Some(path_value(key, &rest, line_number)?),
            "sbp_file" => config.sbp_file = Some(path_value(key, &rest, line_number)?),
            "cfunc_file" => config.cfunc_file = Some(path_value(key, &rest, line_number)?),
            "T_file" => config.temperature_file = Some(path_value(key, &rest, line_number)?),
            "z" => config.z = Some(scalar_value(key, &rest, line_number)?),
            "cm_per_pixel" => config.cm_per_pixel = Some(scalar_value(key, &rest, line_number)?),
            "rmin_pixel" => config.rmin_pixel = Some(scalar_value(key, &rest, line_number)?),
            "rmin_kpc" => config.rmin_kpc = Some(scalar_value(key, &rest, line_number)?),
            "model" => {
                let token = rest.first().ok_or_else(|| missing_value(key, line_number))?;
                config.model = Some(ModelChoice::parse(token)?);
            }
            _ => {
                let numbers: Vec<f64> = rest
                    .iter()
                    .map_while(|token| token.parse::<f64>().ok())
                    .collect();
                let Some(value) = numbers.first().copied() else {
                    debug!(key, line = line_number, "ignoring configuration line without numbers");
                    continue;
                };
                let bounds = (numbers.len() == 3).then(|| (numbers[1], numbers[2]));
                config
                    .params
                    .insert(key.to_string(), ParamEntry { value, bounds });
            }
        }
    }

    Ok(config)
}

fn missing_value(key: &str, line_number: usize) -> ProfileError {
    ProfileError::input_validation(
        "INPUT.CONFIG_VALUE",
        format!("configuration key '{key}' on line {line_number} has no value"),
    )
}

fn path_value(key: &str, rest: &[&str], line_number: usize) -> ProfileResult<PathBuf> {
    rest.first()
        .map(PathBuf::from)
        .ok_or_else(|| missing_value(key, line_number))
}

fn scalar_value(key: &str, rest: &[&str], line_number: usize) -> ProfileResult<f64> {
    let token = rest.first().ok_or_else(|| missing_value(key, line_number))?;
    token.parse::<f64>().map_err(|_| {
        ProfileError::input_validation(
            "INPUT.CONFIG_VALUE",
            format!("configuration key '{key}' on line {line_number} expects a number, got '{token}'"),
        )
    })
}

fn required_path<'a>(key: &str, path: &'a Option<PathBuf>) -> ProfileResult<&'a Path> {
    path.as_deref().ok_or_else(|| {
        ProfileError::input_validation(
            "INPUT.CONFIG_MISSING_KEY",
            format!("configuration is missing required key '{key}'"),
        )
    })
}

impl FitConfig {
    /// Relative data paths are taken relative to the configuration file's directory.
    pub fn resolve_paths_against(&mut self, base: &Path) {
        for path in [
            &mut self.radius_file,
            &mut self.sbp_file,
            &mut self.cfunc_file,
            &mut self.temperature_file,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn radius_path(&self) -> ProfileResult<&Path> {
        required_path("radius_file", &self.radius_file)
    }

    pub fn sbp_path(&self) -> ProfileResult<&Path> {
        required_path("sbp_file", &self.sbp_file)
    }

    pub fn cfunc_path(&self) -> ProfileResult<&Path> {
        required_path("cfunc_file", &self.cfunc_file)
    }

    pub fn temperature_path(&self) -> ProfileResult<&Path> {
        required_path("T_file", &self.temperature_file)
    }

    pub fn require_cm_per_pixel(&self) -> ProfileResult<f64> {
        match self.cm_per_pixel {
            Some(value) if value > 0.0 && value.is_finite() => Ok(value),
            Some(value) => Err(ProfileError::input_validation(
                "INPUT.CONFIG_VALUE",
                format!("cm_per_pixel must be positive, got {value}"),
            )),
            None => Err(ProfileError::input_validation(
                "INPUT.CONFIG_MISSING_KEY",
                "configuration is missing required key 'cm_per_pixel'",
            )),
        }
    }

    pub fn redshift(&self) -> ProfileResult<f64> {
        self.z.ok_or_else(|| {
            ProfileError::input_validation(
                "INPUT.CONFIG_MISSING_KEY",
                "configuration is missing required key 'z'",
            )
        })
    }

    /// Inner radius cut in pixels.
    ///
    /// A positive `rmin_pixel` wins; otherwise `rmin_kpc` is converted as given,
    /// so an unset or non-positive value keeps every annulus.
    pub fn rmin_pixels(&self) -> ProfileResult<f64> {
        if let Some(rmin) = self.rmin_pixel.filter(|value| *value > 0.0) {
            return Ok(rmin);
        }
        let cm_per_pixel = self.require_cm_per_pixel()?;
        let rmin_kpc = self.rmin_kpc.unwrap_or(UNSET_RMIN_KPC);
        Ok(rmin_kpc * KPC / cm_per_pixel)
    }

    /// Picks the density model; the double-beta family decides tying from the slope keys.
    pub fn select_density_model(&self) -> ProfileResult<RadialModel> {
        match self.model {
            Some(ModelChoice::Beta) => Ok(RadialModel::Beta),
            Some(ModelChoice::Nfw) => Ok(RadialModel::nfw_density()),
            Some(ModelChoice::OrderedDoubleBeta) => Ok(RadialModel::ordered_double_beta()),
            Some(ModelChoice::DoubleBeta) | None => self.select_double_beta(),
        }
    }

    fn select_double_beta(&self) -> ProfileResult<RadialModel> {
        let tied = self.has_param("beta");
        let untied = self.has_param("beta1") || self.has_param("beta2");
        match (tied, untied) {
            (true, false) => Ok(RadialModel::TiedDoubleBeta),
            (false, true) => Ok(RadialModel::double_beta()),
            _ => Err(ProfileError::input_validation(
                "INPUT.CONFIG_BETA_TIE",
                "cannot decide whether to tie the slopes: configure either 'beta' or 'beta1'/'beta2'",
            )),
        }
    }

    /// Applies configured values and bounds onto a model or projector parameter set.
    ///
    /// Slope parameters start at 0.7 within [0.3, 1.4]; configured entries
    /// override the value, and override the bounds only when both are given.
    pub fn apply_parameters(&self, set: &mut ParameterSet) -> ProfileResult<()> {
        for name in SLOPE_PARAMS {
            if set.index_of(name).is_some() {
                set.set_value(name, DEFAULT_SLOPE)?;
                set.set_bounds(name, DEFAULT_SLOPE_BOUNDS.0, DEFAULT_SLOPE_BOUNDS.1)?;
            }
        }

        for (name, entry) in &self.params {
            set.set_value(name, entry.value)?;
            if let Some((bound_a, bound_b)) = entry.bounds {
                set.set_bounds(name, bound_a, bound_b)?;
            }
        }
        Ok(())
    }
}
