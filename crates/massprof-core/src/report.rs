use crate::domain::ProfileError;
use crate::physics::{BandLuminosity, CoolingTimeSample, MassProfileSample, OverdensitySample};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterValue {
    pub name: String,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnulusRow {
    pub inner_pixel: f64,
    pub outer_pixel: f64,
    pub radius_kpc: f64,
    pub observed: f64,
    pub error: f64,
    pub model: f64,
    pub chi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionReport {
    pub model: String,
    pub execution_mode: String,
    pub parameters: Vec<ParameterValue>,
    pub constraints_met: bool,
    pub annuli: Vec<AnnulusRow>,
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub reduced_chi_square: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassProfileReport {
    pub model: String,
    pub redshift: f64,
    pub cm_per_pixel: f64,
    pub samples: Vec<MassProfileSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdensityReport {
    pub model: String,
    pub redshift: f64,
    pub rho0: f64,
    pub rs_kpc: f64,
    pub samples: Vec<OverdensitySample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuminosityReport {
    pub model: String,
    pub redshift: f64,
    pub r_out_kpc: f64,
    pub angular_diameter_distance: f64,
    pub luminosity_distance: f64,
    pub bands: Vec<BandLuminosity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoolingTimeReport {
    pub luminosity_distance: f64,
    pub cm_per_pixel: f64,
    pub samples: Vec<CoolingTimeSample>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to create report directory '{}': {source}", path.display())]
    ReportDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize report '{}': {source}", path.display())]
    SerializeReport {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write report '{}': {source}", path.display())]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<ReportError> for ProfileError {
    fn from(error: ReportError) -> Self {
        ProfileError::io_system("IO.REPORT_WRITE", error.to_string())
    }
}

pub fn write_json_report<T: Serialize>(report_path: &Path, report: &T) -> Result<(), ReportError> {
    if let Some(parent_dir) = report_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent_dir).map_err(|source| ReportError::ReportDirectory {
            path: parent_dir.to_path_buf(),
            source,
        })?;
    }

    let report_json =
        serde_json::to_string_pretty(report).map_err(|source| ReportError::SerializeReport {
            path: report_path.to_path_buf(),
            source,
        })?;
    fs::write(report_path, report_json).map_err(|source| ReportError::WriteReport {
        path: report_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{CoolingTimeReport, write_json_report};
    use crate::domain::{ProfileError, ProfileErrorCategory};
    use crate::physics::CoolingTimeSample;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reports_are_written_as_pretty_json_in_nested_directories() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("out/nested/tcool.json");
        let report = CoolingTimeReport {
            luminosity_distance: 1.0e27,
            cm_per_pixel: 1.0e21,
            samples: vec![CoolingTimeSample {
                radius_kpc: 10.0,
                density: 0.01,
                cooling_time_gyr: None,
            }],
        };

        write_json_report(&path, &report).expect("report should write");
        let parsed: Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(parsed["samples"][0]["radius_kpc"], 10.0);
        assert!(parsed["samples"][0]["cooling_time_gyr"].is_null());
    }

    #[test]
    fn write_failures_map_to_io_errors() {
        let temp = TempDir::new().expect("tempdir");
        let blocker = temp.path().join("file");
        fs::write(&blocker, "x").expect("write");

        let error = write_json_report(&blocker.join("report.json"), &1.0_f64)
            .expect_err("parent is a file");
        let profile_error: ProfileError = error.into();
        assert_eq!(profile_error.category(), ProfileErrorCategory::IoSystemError);
        assert_eq!(profile_error.placeholder(), "IO.REPORT_WRITE");
    }
}
