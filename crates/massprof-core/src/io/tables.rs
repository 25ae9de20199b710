//! Whitespace-delimited numeric tables.
//!
//! Blank lines and `#` comments are skipped. Reading stops at the first row
//! that does not provide the requested number of numeric columns.

use crate::domain::{ProfileError, ProfileResult, RadiusPartition};
use crate::fitting::ObservedProfile;
use crate::numerics::CubicSpline;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Minimum signal-to-noise kept from a surface-brightness table.
pub const MIN_SIGNAL_TO_NOISE: f64 = 2.0;

pub fn parse_columns(source: &str, columns: usize) -> Vec<Vec<f64>> {
    let mut rows = Vec::new();
    for (line_index, line) in source.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let row: Option<Vec<f64>> = content
            .split_whitespace()
            .take(columns)
            .map(|token| token.parse::<f64>().ok())
            .collect();
        match row {
            Some(row) if row.len() == columns => rows.push(row),
            _ => {
                warn!(
                    line = line_index + 1,
                    "stopping table read at malformed row"
                );
                break;
            }
        }
    }
    rows
}

pub fn read_columns(path: &Path, columns: usize) -> ProfileResult<Vec<Vec<f64>>> {
    let source = fs::read_to_string(path).map_err(|error| {
        ProfileError::io_system(
            "IO.TABLE_READ",
            format!("failed to read table '{}': {error}", path.display()),
        )
    })?;
    let rows = parse_columns(&source, columns);
    debug!(path = %path.display(), rows = rows.len(), "read table");
    Ok(rows)
}

/// One boundary radius (pixels) per row.
pub fn read_radius_table(path: &Path) -> ProfileResult<Vec<f64>> {
    Ok(read_columns(path, 1)?.into_iter().map(|row| row[0]).collect())
}

/// Two-column rows.
pub fn read_pair_table(path: &Path) -> ProfileResult<Vec<(f64, f64)>> {
    Ok(read_columns(path, 2)?
        .into_iter()
        .map(|row| (row[0], row[1]))
        .collect())
}

/// `value error` rows up to the first one whose signal-to-noise falls below 2.
pub fn read_brightness_table(path: &Path) -> ProfileResult<(Vec<f64>, Vec<f64>)> {
    Ok(cut_low_signal(read_pair_table(path)?))
}

pub fn cut_low_signal(rows: Vec<(f64, f64)>) -> (Vec<f64>, Vec<f64>) {
    let total = rows.len();
    let mut values = Vec::with_capacity(total);
    let mut errors = Vec::with_capacity(total);
    for (value, error) in rows {
        if value / error < MIN_SIGNAL_TO_NOISE {
            break;
        }
        values.push(value);
        errors.push(error);
    }
    if values.len() < total {
        warn!(
            kept = values.len(),
            discarded = total - values.len(),
            "surface brightness rows below signal-to-noise 2 discarded"
        );
    }
    (values, errors)
}

/// Two-column spline table.
///
/// Abscissae are multiplied by `x_scale`; reading stops at the first scaled
/// abscissa beyond `cutoff`.
pub fn read_spline_table(
    path: &Path,
    x_scale: f64,
    cutoff: Option<f64>,
) -> ProfileResult<CubicSpline> {
    let mut spline = CubicSpline::new();
    for (x, y) in read_pair_table(path)? {
        let x = x * x_scale;
        if cutoff.is_some_and(|limit| x > limit) {
            break;
        }
        spline.push_point(x, y)?;
    }
    spline.build_natural().map_err(|error| {
        ProfileError::input_validation(
            "INPUT.SPLINE_TABLE",
            format!("spline table '{}' is unusable: {error}", path.display()),
        )
    })?;
    Ok(spline)
}

/// Drops leading boundaries below `rmin` with their brightness rows, then pairs
/// `N + 1` boundaries with `N` values.
pub fn assemble_observed_profile(
    mut radii: Vec<f64>,
    mut values: Vec<f64>,
    mut errors: Vec<f64>,
    rmin: f64,
) -> ProfileResult<ObservedProfile> {
    let leading = radii.iter().take_while(|radius| **radius < rmin).count();
    if leading > 0 {
        warn!(trimmed = leading, rmin, "inner annuli below rmin discarded");
        radii.drain(..leading);
        values.drain(..leading.min(values.len()));
        errors.drain(..leading.min(errors.len()));
    }

    let annuli = values.len().min(errors.len()).min(radii.len().saturating_sub(1));
    radii.truncate(annuli + 1);
    values.truncate(annuli);
    errors.truncate(annuli);

    let partition = RadiusPartition::new(radii)?;
    debug!(annuli, "assembled observed profile");
    ObservedProfile::new(partition, values, errors)
}
