use std::fs;
use std::io;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use log::error;
use log::info;

use pdbg::RunRegistry;
use pdbg::RunSelector;
use pdbg::SourceFrame;
use pdbg::SourceLocator;
use pdbg_tools::VerbosityFlag;
use pdbg_tools::Version;
use pdbg_tools::VersionFlag;
use pdbg_utilities::PdbgError;

#[derive(clap::Parser, Debug)]
#[command(about = "A command line tool for the pdbg debug print utilities", arg_required_else_help = true)]
struct Cli {
    #[command(flatten)]
    version: VersionFlag,

    #[command(flatten)]
    verbosity: VerbosityFlag,

    #[command(subcommand)]
    commands: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Locate(LocateArgs),
    Runs(RunsArgs),
}

#[derive(clap::Args, Debug)]
#[command(about = "Locates a frame of a stack trace and prints its source line(s)")]
struct LocateArgs {
    #[arg(help = "File containing the stack trace, read from stdin when omitted")]
    file: Option<PathBuf>,

    #[arg(long, default_value_t = 0, help = "Index of the frame, zero is the innermost frame")]
    depth: usize,

    #[arg(long, help = "Report paths relative to this directory")]
    app_path: Option<PathBuf>,

    #[arg(long, default_value_t = 1, help = "Number of source lines to print")]
    lines: usize,
}

#[derive(clap::Args, Debug)]
#[command(about = "Shows which calls are printed for a run selector, e.g. '[1, 3]' or '3..=5'")]
struct RunsArgs {
    selector: RunSelector,

    #[arg(long, default_value_t = 10, help = "Number of calls to simulate")]
    calls: u64,
}

fn main() -> Result<ExitCode, PdbgError> {
    let cli = Cli::parse();
    cli.verbosity.init_logger();

    if cli.version.into() {
        eprintln!("{}", Version);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(command) = cli.commands {
        match command {
            Commands::Locate(args) => return locate(args),
            Commands::Runs(args) => {
                for (run, printed) in simulate_runs(&args.selector, args.calls) {
                    println!("{run}: {}", if printed { "print" } else { "skip" });
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn locate(args: LocateArgs) -> Result<ExitCode, PdbgError> {
    let text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let locator = SourceLocator::new()
        .with_app_path(args.app_path)
        .with_source_line_count(args.lines);
    let lines: Vec<&str> = text.lines().collect();
    let frame = locator.locate_text(&lines, args.depth);

    if frame == SourceFrame::default() {
        error!("The stack trace has no frame at depth {}", args.depth);
        return Ok(ExitCode::FAILURE);
    }

    println!("{}", format_frame(&frame));
    Ok(ExitCode::SUCCESS)
}

/// Formats the location on the first line followed by the source text, if any.
fn format_frame(frame: &SourceFrame) -> String {
    let mut result = frame.file.clone();
    if let Some(line) = frame.line_number {
        result.push_str(&format!(":{line}"));
    }

    let method = match (&frame.class, &frame.method) {
        (Some(class), Some(method)) => Some(format!("{class}::{method}")),
        (None, Some(method)) => Some(method.clone()),
        _ => None,
    };
    if let Some(method) = method {
        result.push_str(&format!(" in {method}"));
    }

    if !frame.source_text.is_empty() {
        result.push('\n');
        result.push_str(&frame.source_text);
    }
    result
}

/// Counts `calls` calls of a single call site against the selector.
fn simulate_runs(selector: &RunSelector, calls: u64) -> Vec<(u64, bool)> {
    let mut registry = RunRegistry::new();
    let mut result = Vec::new();

    for _ in 0..calls {
        let decision = registry.determine(Some(selector), None);
        result.push((decision.run_number, decision.run));

        if selector.is_exhausted(decision.run_number) {
            info!("No run after {} is printed", decision.run_number);
            break;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn test_simulate_runs() {
        let selector: RunSelector = "[1, 3]".parse().unwrap();
        assert_eq!(simulate_runs(&selector, 10), vec![(1, true), (2, false), (3, true)]);

        let selector: RunSelector = "2..".parse().unwrap();
        assert_eq!(simulate_runs(&selector, 3), vec![(1, false), (2, true), (3, true)]);
    }

    #[test]
    fn test_format_frame() {
        let frame = SourceFrame {
            file: "app/models/user.rb".to_string(),
            line_number: Some(4),
            method: Some("name".to_string()),
            class: Some("User".to_string()),
            source_text: "pd name".to_string(),
        };
        assert_eq!(format_frame(&frame), "app/models/user.rb:4 in User::name\npd name");
    }

    #[test]
    fn test_locate_frame_of_trace() {
        let trace = indoc! {"
            /missing/app/models/user.rb:4:in 'User#name'
            /missing/app/main.rb:10:in 'run'
        "};
        let lines: Vec<&str> = trace.lines().collect();
        let frame = SourceLocator::new().locate_text(&lines, 1);

        assert_eq!(format_frame(&frame), "/missing/app/main.rb:10 in run");
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::parse_from(["pdbg", "runs", "3..=5", "--calls", "4"]);
        match cli.commands {
            Some(Commands::Runs(args)) => {
                assert_eq!(args.selector, RunSelector::from(3..=5));
                assert_eq!(args.calls, 4);
            }
            _ => panic!("expected the runs command"),
        }
    }
}
