//! Loads [Options] from a TOML file, e.g.
//!
//! ```toml
//! app_path = "/work/app"
//! header = true
//! footer = "--- end ---"
//! caller = 3
//! run_at = "3..=5"
//! printer = "log:info"
//! print_engine = "pretty"
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::warn;
use pdbg_run::RunSelector;
use pdbg_run::SelectorError;
use serde::Deserialize;
use thiserror::Error;

use crate::Boundary;
use crate::CallerDepth;
use crate::Options;

/// Environment variable naming the configuration file of the default debugger.
pub const CONFIG_ENV: &str = "PDBG_CONFIG";

/// Configuration file picked up from the working directory when [CONFIG_ENV] is not set.
pub const CONFIG_FILE: &str = "pdbg.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid run_at: {0}")]
    Selector(#[from] SelectorError),

    #[error("Unknown printer '{0}', expected stdout, stderr, none, log or log:<level>")]
    UnknownPrinter(String),

    #[error("Unknown print engine '{0}', expected debug or pretty")]
    UnknownPrintEngine(String),
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct OptionsFile {
    app_path: Option<PathBuf>,
    source_line_count: Option<usize>,
    header: Option<BoundaryValue>,
    wrapper: Option<BoundaryValue>,
    footer: Option<BoundaryValue>,
    printer: Option<String>,
    print_engine: Option<String>,
    announcer: Option<String>,
    caller: Option<CallerValue>,
    run_at: Option<RunAtValue>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum BoundaryValue {
    Enabled(bool),
    Text(String),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum CallerValue {
    Enabled(bool),
    Depth(usize),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RunAtValue {
    Run(u64),
    Runs(Vec<u64>),
    Text(String),
}

impl From<BoundaryValue> for Boundary {
    fn from(value: BoundaryValue) -> Self {
        match value {
            BoundaryValue::Enabled(enabled) => Boundary::from(enabled),
            BoundaryValue::Text(text) => Boundary::from(text),
        }
    }
}

impl From<CallerValue> for CallerDepth {
    fn from(value: CallerValue) -> Self {
        match value {
            CallerValue::Enabled(enabled) => CallerDepth::from(enabled),
            CallerValue::Depth(depth) => CallerDepth::from(depth),
        }
    }
}

impl TryFrom<RunAtValue> for RunSelector {
    type Error = SelectorError;

    fn try_from(value: RunAtValue) -> Result<Self, Self::Error> {
        match value {
            RunAtValue::Run(0) => Err(SelectorError::ZeroIndex),
            RunAtValue::Run(run) => Ok(RunSelector::Exact(run)),
            RunAtValue::Runs(runs) if runs.is_empty() => Err(SelectorError::Empty),
            RunAtValue::Runs(runs) if runs.contains(&0) => Err(SelectorError::ZeroIndex),
            RunAtValue::Runs(runs) => Ok(RunSelector::from(runs)),
            RunAtValue::Text(text) => text.parse(),
        }
    }
}

impl Options {
    /// Parses options from TOML text, options that are not mentioned keep their default.
    pub fn from_toml_str(text: &str) -> Result<Options, ConfigError> {
        let file: OptionsFile = toml::from_str(text)?;
        let defaults = Options::default();

        Ok(Options {
            app_path: file.app_path,
            source_line_count: file.source_line_count.unwrap_or(defaults.source_line_count),
            header: file.header.map(Boundary::from).unwrap_or(defaults.header),
            wrapper: file.wrapper.map(Boundary::from).unwrap_or(defaults.wrapper),
            footer: file.footer.map(Boundary::from).unwrap_or(defaults.footer),
            printer: file.printer.as_deref().map(str::parse).transpose()?.unwrap_or(defaults.printer),
            print_engine: file
                .print_engine
                .as_deref()
                .map(str::parse)
                .transpose()?
                .unwrap_or(defaults.print_engine),
            announcer: file.announcer.unwrap_or(defaults.announcer),
            formatter: defaults.formatter,
            caller: file.caller.map(CallerDepth::from).unwrap_or(defaults.caller),
            run_at: file.run_at.map(RunSelector::try_from).transpose()?,
        })
    }

    /// Reads options from the given TOML file.
    pub fn load(path: &Path) -> Result<Options, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading pdbg options from {}", path.display());
        Options::from_toml_str(&text)
    }

    /// Options for the default debugger: the file named by `PDBG_CONFIG`, else
    /// `pdbg.toml` in the working directory, else the defaults.
    ///
    /// An invalid file is reported as a warning and the defaults are used, so
    /// that a broken configuration does not take down the inspected program.
    pub fn from_env() -> Options {
        let path = match env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => {
                let path = PathBuf::from(CONFIG_FILE);
                if !path.is_file() {
                    return Options::default();
                }
                path
            }
        };

        Options::load(&path).unwrap_or_else(|error| {
            warn!("Ignoring pdbg configuration: {error}");
            Options::default()
        })
    }
}
