use super::CliError;
use super::helpers::*;
use massprof_core::common::constants::{KPC, PROTON_MASS};
use massprof_core::{ExecutionMode, RadialModel};
use massprof_core::fitting::{
    ChiSquare, DEFAULT_REPORT_EVERY, TracingObserver, reduced_chi_square,
};
use massprof_core::io::{read_pair_table, read_spline_table};
use massprof_core::physics::{
    MassProfileInput, NfwOverdensityInput, angular_diameter_distance, band_luminosities,
    cooling_time_profile, derive_mass_profile, luminosity_distance, luminosity_partition,
    nfw_overdensity_profile,
};
use massprof_core::report::{
    AnnulusRow, CoolingTimeReport, LuminosityReport, MassProfileReport, OverdensityReport,
    ParameterValue, ProjectionReport,
};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct ProjectArgs {
    /// Fit configuration file
    #[arg(long)]
    config: PathBuf,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Evaluate annuli and shells in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(clap::Args)]
pub(super) struct ProfileArgs {
    /// Fit configuration file
    #[arg(long)]
    config: PathBuf,

    /// Outer radius of the derived profile in kpc; the NFW over-density
    /// profile ignores it and stops below an over-density of 100
    #[arg(long, default_value_t = 1000.0)]
    rmax_kpc: f64,

    /// First radius of the NFW over-density profile in kpc
    #[arg(long, default_value_t = 1.0)]
    rmin_kpc: f64,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct LxArgs {
    /// Fit configuration file
    #[arg(long)]
    config: PathBuf,

    /// Outer integration radius in kpc
    #[arg(long, default_value_t = 500.0)]
    rout_kpc: f64,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Band cooling-function tables over pixel radii, one band per file
    #[arg(value_name = "CFUNC", required = true)]
    bands: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct TcoolArgs {
    /// `radius_pixel n_e` table
    #[arg(long)]
    density: PathBuf,

    /// Temperature (keV) table over pixel radii
    #[arg(long)]
    temperature: PathBuf,

    /// Flux-unit cooling-function table over pixel radii
    #[arg(long)]
    cfunc: PathBuf,

    /// Luminosity distance in cm
    #[arg(long)]
    dl: f64,

    /// Pixel scale in cm
    #[arg(long)]
    cm_per_pixel: f64,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,
}

pub(super) fn run_project_command(args: ProjectArgs) -> Result<i32, CliError> {
    let config = load_fit_config(&args.config)?;
    let execution_mode = if args.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Serial
    };

    let observed = load_observed_profile(&config).map_err(CliError::Compute)?;
    let configured = configure_projector(
        &config,
        Some(observed.partition().outermost()),
        execution_mode,
    )
    .map_err(CliError::Compute)?;
    let projector = &configured.projector;
    let params = configured.values();

    let model_values = projector
        .evaluate(observed.partition(), &params)
        .map_err(CliError::Compute)?;
    let constraints_met =
        configured.parameters.within_bounds(&params) && projector.meets_constraint(&params);
    let mut objective = ChiSquare::new(projector, &observed)
        .with_bounds_enforced(false)
        .with_observer(Box::new(TracingObserver), DEFAULT_REPORT_EVERY);
    let statistic = objective.evaluate(&params).map_err(CliError::Compute)?;
    let degrees_of_freedom = observed.len().saturating_sub(params.len());
    let reduced = reduced_chi_square(statistic, observed.len(), params.len());

    let partition = observed.partition();
    let cm_per_pixel = projector.cm_per_pixel();
    let annuli: Vec<AnnulusRow> = observed
        .residuals(&model_values)
        .into_iter()
        .enumerate()
        .map(|(annulus, chi)| AnnulusRow {
            inner_pixel: partition.inner(annulus),
            outer_pixel: partition.outer(annulus),
            radius_kpc: pixels_to_kpc(partition.midpoint(annulus), cm_per_pixel),
            observed: observed.values()[annulus],
            error: observed.errors()[annulus],
            model: model_values[annulus],
            chi,
        })
        .collect();

    println!(
        "{:>10} {:>10} {:>12} {:>14} {:>14} {:>14} {:>10}",
        "r_in", "r_out", "r_kpc", "observed", "error", "model", "chi"
    );
    for row in &annuli {
        println!(
            "{:>10.3} {:>10.3} {:>12.4} {:>14.6e} {:>14.6e} {:>14.6e} {:>10}",
            row.inner_pixel,
            row.outer_pixel,
            row.radius_kpc,
            row.observed,
            row.error,
            row.model,
            row.chi.map_or_else(|| "-".to_string(), |chi| format!("{chi:.4}"))
        );
    }
    println!("chi-square: {statistic:.6e} (dof {degrees_of_freedom})");
    println!("reduced chi-square: {}", format_optional(reduced));
    if !constraints_met {
        println!("warning: configured parameters violate bounds or model constraints");
    }

    let report = ProjectionReport {
        model: projector.model().name().to_string(),
        execution_mode: execution_mode.to_string(),
        parameters: configured
            .parameters
            .infos()
            .iter()
            .map(|info| ParameterValue {
                name: info.name.to_string(),
                value: info.value,
                lower: info.lower,
                upper: info.upper,
            })
            .collect(),
        constraints_met,
        annuli,
        chi_square: statistic,
        degrees_of_freedom,
        reduced_chi_square: reduced,
    };
    write_report_if_requested(args.report.as_deref(), &report)?;
    Ok(0)
}

pub(super) fn run_profile_command(args: ProfileArgs) -> Result<i32, CliError> {
    let config = load_fit_config(&args.config)?;
    let configured =
        configure_projector(&config, None, ExecutionMode::Serial).map_err(CliError::Compute)?;
    let cm_per_pixel = config.require_cm_per_pixel().map_err(CliError::Compute)?;
    let redshift = config.redshift().map_err(CliError::Compute)?;
    if matches!(configured.projector.model(), RadialModel::NfwDensity(_)) {
        return run_nfw_overdensity(&args, &configured, cm_per_pixel, redshift);
    }
    let temperature = temperature_spline(&config).map_err(CliError::Compute)?;
    let model_params = configured.model_values();

    let input = MassProfileInput::new(
        configured.projector.model(),
        &model_params,
        &temperature,
        cm_per_pixel,
        redshift,
        kpc_to_pixels(args.rmax_kpc, cm_per_pixel),
    );
    let samples = derive_mass_profile(&input).map_err(CliError::Compute)?;

    println!(
        "{:>12} {:>14} {:>10} {:>14} {:>14} {:>14} {:>14}",
        "r_kpc", "n_e", "T_keV", "M_gas", "M_total", "overdensity", "entropy"
    );
    for sample in &samples {
        println!(
            "{:>12.4} {:>14.6e} {:>10.4} {:>14.6e} {:>14} {:>14} {:>14}",
            sample.radius_kpc,
            sample.density,
            sample.temperature_kev,
            sample.gas_mass,
            format_optional(sample.total_mass),
            format_optional(sample.overdensity),
            format_optional(sample.entropy)
        );
    }

    let report = MassProfileReport {
        model: configured.projector.model().name().to_string(),
        redshift,
        cm_per_pixel,
        samples,
    };
    write_report_if_requested(args.report.as_deref(), &report)?;
    Ok(0)
}

fn run_nfw_overdensity(
    args: &ProfileArgs,
    configured: &ConfiguredProjector,
    cm_per_pixel: f64,
    redshift: f64,
) -> Result<i32, CliError> {
    let params = configured.model_values();
    let rho0 = params[0].abs() * PROTON_MASS;
    let rs_kpc = pixels_to_kpc(params[1].abs(), cm_per_pixel);
    let mut input = NfwOverdensityInput::new(rho0, rs_kpc * KPC, redshift);
    input.r_start_kpc = args.rmin_kpc;
    let samples = nfw_overdensity_profile(&input).map_err(CliError::Compute)?;

    println!(
        "{:>12} {:>14} {:>14} {:>14}",
        "r_kpc", "M_enclosed", "rho_mean", "overdensity"
    );
    for sample in &samples {
        println!(
            "{:>12.4} {:>14.6e} {:>14.6e} {:>14.6e}",
            sample.radius_kpc, sample.enclosed_mass, sample.mean_density, sample.overdensity
        );
    }

    let report = OverdensityReport {
        model: configured.projector.model().name().to_string(),
        redshift,
        rho0,
        rs_kpc,
        samples,
    };
    write_report_if_requested(args.report.as_deref(), &report)?;
    Ok(0)
}

pub(super) fn run_lx_command(args: LxArgs) -> Result<i32, CliError> {
    let config = load_fit_config(&args.config)?;
    let mut configured =
        configure_projector(&config, None, ExecutionMode::Serial).map_err(CliError::Compute)?;
    let cm_per_pixel = config.require_cm_per_pixel().map_err(CliError::Compute)?;
    let redshift = config.redshift().map_err(CliError::Compute)?;
    let distance = luminosity_distance(cm_per_pixel, redshift);
    let partition =
        luminosity_partition(args.rout_kpc, cm_per_pixel).map_err(CliError::Compute)?;

    let bands = args
        .bands
        .iter()
        .map(|path| {
            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            read_spline_table(path, 1.0, None).map(|spline| (label, spline))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(CliError::Compute)?;

    let params = configured.values();
    let results = band_luminosities(
        &mut configured.projector,
        &params,
        &partition,
        bands,
        distance,
    )
    .map_err(CliError::Compute)?;

    println!("D_L = {distance:.6e} cm");
    println!("{:>20} {:>14} {:>14}", "band", "flux", "luminosity");
    for band in &results {
        println!(
            "{:>20} {:>14.6e} {:>14.6e}",
            band.band, band.flux, band.luminosity
        );
    }

    let report = LuminosityReport {
        model: configured.projector.model().name().to_string(),
        redshift,
        r_out_kpc: args.rout_kpc,
        angular_diameter_distance: angular_diameter_distance(cm_per_pixel),
        luminosity_distance: distance,
        bands: results,
    };
    write_report_if_requested(args.report.as_deref(), &report)?;
    Ok(0)
}

pub(super) fn run_tcool_command(args: TcoolArgs) -> Result<i32, CliError> {
    if !(args.cm_per_pixel > 0.0 && args.dl > 0.0) {
        return Err(CliError::Usage(format!(
            "--cm-per-pixel and --dl must be positive, got {} and {}",
            args.cm_per_pixel, args.dl
        )));
    }

    let kpc_per_pixel = pixels_to_kpc(1.0, args.cm_per_pixel);
    let rows: Vec<(f64, f64)> = read_pair_table(&args.density)
        .map_err(CliError::Compute)?
        .into_iter()
        .map(|(radius, density)| (radius * kpc_per_pixel, density))
        .collect();
    let temperature =
        read_spline_table(&args.temperature, kpc_per_pixel, None).map_err(CliError::Compute)?;
    let cooling_function =
        read_spline_table(&args.cfunc, kpc_per_pixel, None).map_err(CliError::Compute)?;

    let samples = cooling_time_profile(&rows, &temperature, &cooling_function, args.dl)
        .map_err(CliError::Compute)?;

    println!("{:>12} {:>14} {:>14}", "r_kpc", "n_e", "t_cool_Gyr");
    for sample in &samples {
        println!(
            "{:>12.4} {:>14.6e} {:>14}",
            sample.radius_kpc,
            sample.density,
            format_optional(sample.cooling_time_gyr)
        );
    }

    let report = CoolingTimeReport {
        luminosity_distance: args.dl,
        cm_per_pixel: args.cm_per_pixel,
        samples,
    };
    write_report_if_requested(args.report.as_deref(), &report)?;
    Ok(0)
}
