use crate::report::{
    run_cohort_report, run_student_report, run_threshold, CohortReportArgs, StudentReportArgs,
    ThresholdArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tyl_analytics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TYL Analytics",
    about = "Evaluate TYL eligibility and cohort pass counts from the command line",
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
    /// Print student or cohort TYL reports from CSV exports
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Resolve the passing threshold for a subject code
    Threshold(ThresholdArgs),
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Subject outcomes and levels reached for one student
    Student(StudentReportArgs),
    /// Pass counts and category reach for a department, section or year
    Cohort(CohortReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Student profile CSV used to seed the in-memory store
    #[arg(long, requires = "marks")]
    pub(crate) profiles: Option<PathBuf>,
    /// Mark record CSV used to seed the in-memory store
    #[arg(long, requires = "profiles")]
    pub(crate) marks: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report {
            command: ReportCommand::Student(args),
        } => run_student_report(args),
        Command::Report {
            command: ReportCommand::Cohort(args),
        } => run_cohort_report(args),
        Command::Threshold(args) => run_threshold(args),
    }
}
