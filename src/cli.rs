use crate::commands::{run_inspect, run_report, InspectArgs, ReportArgs};
use clap::{Parser, Subcommand};
use job_insights::config::AppConfig;
use job_insights::error::AppError;
use job_insights::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "job-insights",
    about = "Summarize job listing demand by company, title, location and skill",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, clean, aggregate and chart a listings export (default command)
    Report(ReportArgs),
    /// Print the schema, a row preview and cleaning statistics of an export
    Inspect(InspectArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Report(ReportArgs::default()));

    match command {
        Command::Report(args) => run_report(args, config),
        Command::Inspect(args) => run_inspect(args, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_flags_parse() {
        let cli = Cli::try_parse_from([
            "job-insights",
            "report",
            "--input",
            "jobs.csv",
            "--text-only",
            "--rows",
            "5",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Report(args)) => {
                assert!(args.text_only);
                assert!(!args.json);
                assert_eq!(args.rows, Some(5));
                assert_eq!(
                    args.input.as_deref(),
                    Some(std::path::Path::new("jobs.csv"))
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn json_and_text_only_conflict() {
        let err = Cli::try_parse_from(["job-insights", "report", "--json", "--text-only"])
            .expect_err("flags conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn zero_rows_is_rejected() {
        for command in ["report", "inspect"] {
            let err = Cli::try_parse_from(["job-insights", command, "--rows", "0"])
                .expect_err("zero rows rejected");
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }

        let cli = Cli::try_parse_from(["job-insights", "inspect", "--rows", "1"])
            .expect("one row accepted");
        assert!(matches!(
            cli.command,
            Some(Command::Inspect(InspectArgs { rows: Some(1), .. }))
        ));
    }
}
