use massprof_core::common::{ModelChoice, parse_config};
use massprof_core::domain::{ProfileErrorCategory, RadiusPartition};
use massprof_core::fitting::{ChiSquare, INFEASIBLE_STATISTIC};
use massprof_core::io::{
    assemble_observed_profile, read_brightness_table, read_radius_table, read_spline_table,
};
use massprof_core::models::RadialModel;
use massprof_core::projector::ShellProjector;
use std::fs;
use tempfile::TempDir;

#[test]
fn slope_keys_decide_whether_double_beta_is_tied() {
    let tied = parse_config("n01 1\nbeta 0.6\n").expect("tied config");
    assert_eq!(
        tied.select_density_model().expect("tied"),
        RadialModel::TiedDoubleBeta
    );

    let untied = parse_config("model dbeta\nbeta2 0.9 0.5 1.2\n").expect("untied config");
    assert_eq!(
        untied.select_density_model().expect("untied"),
        RadialModel::double_beta()
    );

    let explicit = parse_config("model beta\nbeta 0.6\nbeta1 0.7\n").expect("beta config");
    assert_eq!(explicit.model, Some(ModelChoice::Beta));
    assert_eq!(explicit.select_density_model().expect("beta"), RadialModel::Beta);
}

#[test]
fn ambiguous_or_missing_slopes_are_input_errors() {
    for source in ["beta 0.6\nbeta1 0.7\n", "n01 1\nrc1 10\n"] {
        let config = parse_config(source).expect("config parses");
        let error = config
            .select_density_model()
            .expect_err("tie decision must fail");
        assert_eq!(error.category(), ProfileErrorCategory::InputValidationError);
        assert_eq!(error.placeholder(), "INPUT.CONFIG_BETA_TIE");
        assert_eq!(error.exit_code(), 2);
    }
}

#[test]
fn unknown_model_names_are_rejected() {
    let error = parse_config("model king\n").expect_err("unknown model");
    assert_eq!(error.placeholder(), "INPUT.CONFIG_MODEL");
}

#[test]
fn configured_tables_reproduce_a_synthetic_profile() {
    let temp = TempDir::new().expect("tempdir");
    let data_dir = temp.path().join("data");
    fs::create_dir_all(&data_dir).expect("data dir");

    let radii: Vec<f64> = (0..=10).map(f64::from).collect();
    let cooling_rows = "0 2.0\n5 1.6\n10 1.5\n40 1.4\n";
    fs::write(data_dir.join("cfunc.txt"), cooling_rows).expect("write cfunc");
    let cooling_function =
        read_spline_table(&data_dir.join("cfunc.txt"), 1.0, Some(10.0)).expect("cfunc");

    let true_params = [0.05, 2.0, 0.01, 12.0, 0.72, 0.001];
    let mut truth = ShellProjector::new(RadialModel::TiedDoubleBeta);
    truth.attach_cooling_function(cooling_function.clone());
    let trimmed = RadiusPartition::new(radii[1..].to_vec()).expect("trimmed partition");
    let synthetic = truth.evaluate(&trimmed, &true_params).expect("synthetic");

    let radius_rows: String = radii.iter().map(|radius| format!("{radius}\n")).collect();
    let mut sbp_rows = String::from("1 0.1\n");
    for value in &synthetic {
        sbp_rows.push_str(&format!("{value} {}\n", value * 0.1));
    }
    fs::write(data_dir.join("radius.txt"), radius_rows).expect("write radius");
    fs::write(data_dir.join("sbp.txt"), sbp_rows).expect("write sbp");

    let config_path = temp.path().join("fit.cfg");
    fs::write(
        &config_path,
        "\
radius_file data/radius.txt
sbp_file data/sbp.txt
cfunc_file data/cfunc.txt
cm_per_pixel 1
rmin_pixel 0.5
n01 0.05
rc1 2
n02 0.01
rc2 12
beta 0.72 0.5 1.0
bkg 0.001
",
    )
    .expect("write config");

    let mut config =
        parse_config(&fs::read_to_string(&config_path).expect("read config")).expect("config");
    config.resolve_paths_against(temp.path());
    let model = config.select_density_model().expect("model");
    assert_eq!(model, RadialModel::TiedDoubleBeta);

    let radii = read_radius_table(config.radius_path().expect("radius path")).expect("radii");
    let (values, errors) =
        read_brightness_table(config.sbp_path().expect("sbp path")).expect("sbp");
    let observed = assemble_observed_profile(
        radii,
        values,
        errors,
        config.rmin_pixels().expect("rmin"),
    )
    .expect("observed profile");
    assert_eq!(observed.partition().boundaries(), trimmed.boundaries());

    let mut projector = ShellProjector::new(model).with_cm_per_pixel(1.0);
    let cooling_function = read_spline_table(
        config.cfunc_path().expect("cfunc path"),
        1.0,
        Some(observed.partition().outermost()),
    )
    .expect("configured cfunc");
    projector.attach_cooling_function(cooling_function);

    let mut parameters = projector.parameter_set();
    config
        .apply_parameters(&mut parameters)
        .expect("parameters apply");
    assert_eq!(parameters.values(), true_params.to_vec());
    let beta = parameters.get("beta").expect("beta info");
    assert_eq!((beta.lower, beta.upper), (0.5, 1.0));

    let mut objective =
        ChiSquare::new(&projector, &observed).with_configured_bounds(parameters.clone());
    let statistic = objective
        .evaluate(&parameters.values())
        .expect("statistic");
    assert!(statistic < 1.0e-20, "statistic {statistic}");

    let mut shifted = parameters.values();
    shifted[4] = 1.2;
    assert_eq!(
        objective.evaluate(&shifted).expect("out of bounds"),
        INFEASIBLE_STATISTIC
    );
}

#[test]
fn unknown_parameters_in_the_config_are_rejected_on_apply() {
    let config = parse_config("model beta\nn0 0.1\nrc2 10\n").expect("config");
    let projector = ShellProjector::new(config.select_density_model().expect("beta"));
    let mut parameters = projector.parameter_set();
    let error = config
        .apply_parameters(&mut parameters)
        .expect_err("rc2 is not a beta parameter");
    assert_eq!(error.placeholder(), "INPUT.UNKNOWN_PARAMETER");
}

#[test]
fn unset_inner_cut_keeps_every_annulus() {
    let config = parse_config("cm_per_pixel 1.0e21\n").expect("config");
    let rmin = config.rmin_pixels().expect("rmin");
    assert!(rmin < 0.0, "unset rmin_kpc should not cut, got {rmin}");

    let radii: Vec<f64> = (0..=20).map(f64::from).collect();
    let values = vec![1.0; 19];
    let errors = vec![0.1; 19];
    let observed =
        assemble_observed_profile(radii, values, errors, rmin).expect("observed profile");
    assert_eq!(observed.len(), 19);
    assert_eq!(observed.partition().inner(0), 0.0);
}
