use std::fmt;

use clap::Args;
use log::LevelFilter;

/// The `--quiet`, `--verbose`, `--debug` and `--trace` flags shared by the tools.
#[derive(Args, Debug)]
pub struct VerbosityFlag {
    #[arg(short, long, global = true, default_value_t = false, help = "Only print results, no log messages")]
    quiet: bool,

    #[arg(short, long, global = true, default_value_t = false, help = "Print informational log messages (default)")]
    verbose: bool,

    #[arg(short, long, global = true, default_value_t = false, help = "Print debug log messages, e.g. unreadable source files")]
    debug: bool,

    #[arg(long, global = true, default_value_t = false, help = "Print every trace message")]
    trace: bool,
}

impl VerbosityFlag {
    /// Returns the log level filter corresponding to the given verbosity flags.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.verbosity().log_level_filter()
    }

    /// Returns the verbosity selected by the flags, where `--quiet` wins over everything else.
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.trace {
            Verbosity::Trace
        } else if self.debug {
            Verbosity::Debug
        } else {
            Verbosity::Verbose
        }
    }

    /// Initialises `env_logger` with the level of these flags, `RUST_LOG` can still override it per module.
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.log_level_filter())
            .format_timestamp(None)
            .parse_default_env()
            .init();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Verbose,
    Debug,
    Trace,
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Quiet => write!(f, "quiet"),
            Verbosity::Verbose => write!(f, "verbose"),
            Verbosity::Debug => write!(f, "debug"),
            Verbosity::Trace => write!(f, "trace"),
        }
    }
}

impl Verbosity {
    /// Returns the log filter level corresponding to this verbosity.
    pub fn log_level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Verbose => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        verbosity: VerbosityFlag,
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::parse_from(["pdbg"]);
        assert_eq!(cli.verbosity.log_level_filter(), LevelFilter::Info);

        let cli = Cli::parse_from(["pdbg", "--quiet", "--trace"]);
        assert_eq!(cli.verbosity.log_level_filter(), LevelFilter::Off);

        let cli = Cli::parse_from(["pdbg", "--debug"]);
        assert_eq!(cli.verbosity.verbosity(), Verbosity::Debug);
        assert_eq!(cli.verbosity.verbosity().to_string(), "debug");
    }
}
