use crate::assess::{run_analyze, run_assess, AnalyzeArgs, AssessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use uae_flood::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "UAE Flood Detection & Cloud Seeding",
    about = "Serve the flood dashboard or assess the emirates from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print flood, agriculture and hydropower rankings for every emirate
    Assess(AssessArgs),
    /// Run a seeding decision for one location and optionally save the report
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed for generated weather when no API key is configured
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args).await,
        Command::Analyze(args) => run_analyze(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["uae-flood-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn analyze_takes_a_location_and_flags() {
        let cli = Cli::try_parse_from([
            "uae-flood-api",
            "analyze",
            "dubai",
            "--remote",
            "--simulate-rainfall",
            "40",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.location, "dubai");
                assert!(args.options.remote);
                assert_eq!(args.options.simulate_rainfall, Some(40.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
