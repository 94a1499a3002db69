#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

// Allows the exported macros and `#[pdbg_test(reset)]` to refer to `::pdbg` within this crate.
extern crate self as pdbg;

mod config;
mod debugger;
mod error_report;
mod expression;
mod formatter;
mod global;
mod macros;
mod options;
mod print_engine;
mod printer;

pub use config::*;
pub use debugger::*;
pub use error_report::*;
pub use expression::*;
pub use formatter::*;
pub use global::*;
pub use options::*;
pub use print_engine::*;
pub use printer::*;

pub use pdbg_run::CallSiteKey;
pub use pdbg_run::RunDecision;
pub use pdbg_run::RunRegistry;
pub use pdbg_run::RunSelector;
pub use pdbg_run::SelectorError;
pub use pdbg_source::SourceFrame;
pub use pdbg_source::SourceLocator;
pub use pdbg_source::StackFrame;
pub use pdbg_source::parse_backtrace;
pub use pdbg_source::parse_frame;
