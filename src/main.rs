//! tps CLI entrypoint.
//!
//! This is the main entrypoint for the plan summary command-line tool.

use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use tfplan_summary::cli::{Cli, Commands, GitLabArgs, OutputFormatter, SummaryArgs, TableFormat};
use tfplan_summary::config::{load_dotenv, ENV_FILE_NAME};
use tfplan_summary::error::Result;
use tfplan_summary::notify::{post_summary, GitLabNotifier};
use tfplan_summary::plan::PlanParser;
use tfplan_summary::summary::{Aggregator, Summary};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let env_loaded = std::env::current_dir()
        .map_err(Into::into)
        .and_then(|dir| load_dotenv(&dir));

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match env_loaded {
        Ok(Some(path)) => info!("Loaded environment from: {}", path.display()),
        Ok(None) => debug!("No {ENV_FILE_NAME} file in the working directory"),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Show { summary, no_color } => {
            let colored = !no_color && std::io::stdout().is_terminal();
            cmd_show(&summary, &formatter.with_color(colored))
        }
        Commands::Comment {
            summary,
            gitlab,
            dry_run,
        } => cmd_comment(&summary, gitlab, dry_run, &formatter).await,
    }
}

/// Print the plan summary.
fn cmd_show(args: &SummaryArgs, formatter: &OutputFormatter) -> Result<()> {
    let summary = load_summary(args)?;
    let output = formatter.format_summary(&summary, args.table_or(TableFormat::Grid), args.only_class());
    print(&output)
}

/// Print the plan summary and post it as a merge request note.
async fn cmd_comment(
    args: &SummaryArgs,
    gitlab: GitLabArgs,
    dry_run: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let summary = load_summary(args)?;
    let table = args.table_or(TableFormat::Compact);
    let body = OutputFormatter::format_comment(&summary, table, args.only_class());

    if dry_run {
        info!("Dry run: comment not posted");
        return print(&body);
    }

    // Printed before posting; a failed post keeps the summary in the job log.
    print(&formatter.format_summary(&summary, table, args.only_class()))?;

    let config = gitlab.into_config()?;
    debug!("GitLab settings: {config:?}");
    let notifier = GitLabNotifier::new(&config)?;
    post_summary(&notifier, &config.target(), &body).await
}

/// Loads, parses and summarizes the plan named by the arguments.
fn load_summary(args: &SummaryArgs) -> Result<Summary> {
    let plan = PlanParser::new().load_file(&args.path)?;
    Ok(Aggregator::with_query(args.query.as_str()).summarize(&plan))
}

/// Writes to stdout.
fn print(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
