use std::path::PathBuf;

use pdbg_run::RunSelector;

use crate::Formatter;
use crate::PrintEngine;
use crate::Printer;

/// Default number of source lines read for every call.
pub const SOURCE_LINE_COUNT_DEFAULT: usize = 1;

/// Default announcer printed in front of the location.
pub const ANNOUNCER_DEFAULT: &str = "[PD]";

const BOUNDARY_WIDTH: usize = 80;

/// A line printed above and/or below the print out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Boundary {
    #[default]
    Off,

    /// The default line of the option, e.g. 80 `*` characters for the wrapper.
    Default,

    Custom(String),
}

impl Boundary {
    /// Returns the line to print, if any.
    pub fn resolve(&self, default_char: char) -> Option<String> {
        match self {
            Boundary::Off => None,
            Boundary::Default => Some(default_char.to_string().repeat(BOUNDARY_WIDTH)),
            Boundary::Custom(text) => Some(text.clone()),
        }
    }
}

impl From<bool> for Boundary {
    fn from(enabled: bool) -> Self {
        if enabled { Boundary::Default } else { Boundary::Off }
    }
}

impl From<&str> for Boundary {
    fn from(text: &str) -> Self {
        Boundary::from(text.to_string())
    }
}

impl From<String> for Boundary {
    fn from(text: String) -> Self {
        if text.is_empty() {
            Boundary::Off
        } else {
            Boundary::Custom(text)
        }
    }
}

/// How much of the calling stack is appended to the print out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallerDepth {
    #[default]
    Off,

    /// The complete stack of callers.
    Full,

    /// The callers up to and including the given 0-based depth.
    Depth(usize),
}

impl CallerDepth {
    /// Returns the maximum number of caller frames to print.
    pub fn limit(&self) -> usize {
        match self {
            CallerDepth::Off => 0,
            CallerDepth::Full => usize::MAX,
            CallerDepth::Depth(depth) => depth.saturating_add(1),
        }
    }
}

impl From<bool> for CallerDepth {
    fn from(enabled: bool) -> Self {
        if enabled { CallerDepth::Full } else { CallerDepth::Off }
    }
}

impl From<usize> for CallerDepth {
    fn from(depth: usize) -> Self {
        CallerDepth::Depth(depth)
    }
}

/// The global options of a [crate::Debugger].
#[derive(Clone, Debug)]
pub struct Options {
    /// Root directory that is stripped from reported file paths.
    pub app_path: Option<PathBuf>,
    pub source_line_count: usize,
    pub header: Boundary,
    pub wrapper: Boundary,
    pub footer: Boundary,
    pub printer: Printer,
    pub print_engine: PrintEngine,
    pub announcer: String,
    pub formatter: Formatter,
    pub caller: CallerDepth,
    pub run_at: Option<RunSelector>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            app_path: None,
            source_line_count: SOURCE_LINE_COUNT_DEFAULT,
            header: Boundary::Off,
            wrapper: Boundary::Off,
            footer: Boundary::Off,
            printer: Printer::default(),
            print_engine: PrintEngine::default(),
            announcer: ANNOUNCER_DEFAULT.to_string(),
            formatter: Formatter::default(),
            caller: CallerDepth::Off,
            run_at: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns these options with every option that is set in `call` replaced.
    pub fn merged(&self, call: &CallOptions) -> Options {
        Options {
            app_path: call.app_path.clone().or_else(|| self.app_path.clone()),
            source_line_count: call.source_line_count.unwrap_or(self.source_line_count),
            header: call.header.clone().unwrap_or_else(|| self.header.clone()),
            wrapper: call.wrapper.clone().unwrap_or_else(|| self.wrapper.clone()),
            footer: call.footer.clone().unwrap_or_else(|| self.footer.clone()),
            printer: call.printer.clone().unwrap_or_else(|| self.printer.clone()),
            print_engine: call.print_engine.clone().unwrap_or_else(|| self.print_engine.clone()),
            announcer: call.announcer.clone().unwrap_or_else(|| self.announcer.clone()),
            formatter: call.formatter.clone().unwrap_or_else(|| self.formatter.clone()),
            caller: call.caller.unwrap_or(self.caller),
            run_at: call.run_at.clone().or_else(|| self.run_at.clone()),
        }
    }
}

/// Options that apply to a single call, overriding the global [Options].
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    pub app_path: Option<PathBuf>,
    pub source_line_count: Option<usize>,
    pub header: Option<Boundary>,
    pub wrapper: Option<Boundary>,
    pub footer: Option<Boundary>,
    pub printer: Option<Printer>,
    pub print_engine: Option<PrintEngine>,
    pub announcer: Option<String>,
    pub formatter: Option<Formatter>,
    pub caller: Option<CallerDepth>,
    /// Counted per call site, unlike the global `run_at` which uses one counter for all calls.
    pub run_at: Option<RunSelector>,
}

/// Generates the builder methods that are shared by [Options] and [CallOptions].
macro_rules! option_setters {
    ($target:ty, $wrap:path) => {
        impl $target {
            pub fn app_path(mut self, app_path: impl Into<PathBuf>) -> Self {
                self.app_path = Some(app_path.into());
                self
            }

            pub fn source_line_count(mut self, count: usize) -> Self {
                self.source_line_count = $wrap(count);
                self
            }

            pub fn header(mut self, header: impl Into<Boundary>) -> Self {
                self.header = $wrap(header.into());
                self
            }

            pub fn wrapper(mut self, wrapper: impl Into<Boundary>) -> Self {
                self.wrapper = $wrap(wrapper.into());
                self
            }

            pub fn footer(mut self, footer: impl Into<Boundary>) -> Self {
                self.footer = $wrap(footer.into());
                self
            }

            pub fn printer(mut self, printer: Printer) -> Self {
                self.printer = $wrap(printer);
                self
            }

            pub fn print_engine(mut self, print_engine: PrintEngine) -> Self {
                self.print_engine = $wrap(print_engine);
                self
            }

            pub fn announcer(mut self, announcer: impl Into<String>) -> Self {
                self.announcer = $wrap(announcer.into());
                self
            }

            pub fn formatter(mut self, formatter: Formatter) -> Self {
                self.formatter = $wrap(formatter);
                self
            }

            pub fn caller(mut self, caller: impl Into<CallerDepth>) -> Self {
                self.caller = $wrap(caller.into());
                self
            }

            pub fn run_at(mut self, run_at: impl Into<RunSelector>) -> Self {
                self.run_at = Some(run_at.into());
                self
            }
        }
    };
}

/// Identity wrapper for the setters of [Options], whose fields are not optional.
fn keep<T>(value: T) -> T {
    value
}

option_setters!(Options, keep);
option_setters!(CallOptions, Some);

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }
}
