use clap::Parser;
use careers_e2e::cli::commands::{cmd_report, cmd_run, ReportArgs, RunArgs};
use careers_e2e::cli::config::{load_config, Cli, Commands};
use careers_e2e::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            features,
            results,
            screenshots,
            headed,
            parameters,
            tags,
        } => {
            let all_passed = cmd_run(
                &config,
                &RunArgs {
                    features: features.as_deref(),
                    results: results.as_deref(),
                    screenshots: screenshots.as_deref(),
                    headed,
                    parameters: parameters.as_deref(),
                    tags: tags.as_deref(),
                },
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Report {
            results,
            screenshots,
            output,
            title,
            strict,
            timestamp,
        } => {
            cmd_report(
                &config,
                &ReportArgs {
                    results: results.as_deref(),
                    screenshots: screenshots.as_deref(),
                    output: output.as_deref(),
                    title: title.as_deref(),
                    strict,
                    timestamp,
                },
            )?;
        }
    }

    Ok(())
}
