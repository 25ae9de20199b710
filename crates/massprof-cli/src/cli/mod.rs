mod commands;
mod helpers;

use clap::Parser;
use massprof_core::domain::ProfileError;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let profile_error = error.as_profile_error();
            eprintln!("{}", profile_error.diagnostic_line());
            profile_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("massprof".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second install in the same process (library callers of `run`) is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "massprof",
    about = "Deprojected gas-density and mass profiles from X-ray surface brightness"
)]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Project the configured density model onto the observed annuli
    Project(commands::ProjectArgs),
    /// Derive gas mass, hydrostatic mass, over-density and entropy profiles
    Profile(commands::ProfileArgs),
    /// Integrate band fluxes and luminosities inside an outer radius
    Lx(commands::LxArgs),
    /// Cooling time for each row of a density table
    Tcool(commands::TcoolArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Project(args) => commands::run_project_command(args),
        CliCommand::Profile(args) => commands::run_profile_command(args),
        CliCommand::Lx(args) => commands::run_lx_command(args),
        CliCommand::Tcool(args) => commands::run_tcool_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(ProfileError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_profile_error(&self) -> ProfileError {
        match self {
            Self::Usage(message) => {
                ProfileError::input_validation("INPUT.CLI_USAGE", message.trim_end())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => ProfileError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
