use std::collections::HashMap;
use std::fmt;

use log::debug;
use pdbg_utilities::debug_trace;

use crate::RunSelector;

/// Identifies a call site by its source file and 1-based line number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteKey {
    file: String,
    line: u32,
}

impl CallSiteKey {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for CallSiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The outcome of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunDecision {
    /// The value of the counter after this run was counted.
    pub run_number: u64,

    /// Whether this run should produce output.
    pub run: bool,
}

/// Counts the runs of every call site, and of the global counter that is used
/// when no call site is given.
///
/// Counters only ever increase, except for [RunRegistry::reset] which clears
/// all of them at once. The registry is owned by its caller, there is no
/// hidden shared state.
#[derive(Default, Debug)]
pub struct RunRegistry {
    global: u64,
    call_sites: HashMap<CallSiteKey, u64>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a run for the given key, or the global counter when `key` is
    /// `None`, and evaluates the selector against the updated counter. An
    /// absent selector always runs.
    ///
    /// The counter is incremented regardless of the outcome.
    pub fn determine(&mut self, selector: Option<&RunSelector>, key: Option<&CallSiteKey>) -> RunDecision {
        let counter = match key {
            Some(key) => self.call_sites.entry(key.clone()).or_insert_with(|| {
                debug!("First run of call site {key}");
                0
            }),
            None => &mut self.global,
        };

        *counter += 1;
        let run_number = *counter;
        let run = selector.is_none_or(|selector| selector.matches(run_number));

        debug_trace!("Run {run_number} of {key:?} with selector {selector:?}: {run}");
        RunDecision { run_number, run }
    }

    /// Same as [RunRegistry::determine], but only returns whether to run.
    pub fn should_run(&mut self, selector: Option<&RunSelector>, key: Option<&CallSiteKey>) -> bool {
        self.determine(selector, key).run
    }

    /// Returns the number of runs counted so far for the given key, or for the
    /// global counter when `key` is `None`.
    pub fn run_number(&self, key: Option<&CallSiteKey>) -> u64 {
        match key {
            Some(key) => self.call_sites.get(key).copied().unwrap_or(0),
            None => self.global,
        }
    }

    /// Returns the number of call sites that have been counted.
    pub fn num_of_call_sites(&self) -> usize {
        self.call_sites.len()
    }

    /// Clears every call site counter and the global counter.
    pub fn reset(&mut self) {
        debug!("Resetting {} call site counters", self.call_sites.len());
        self.global = 0;
        self.call_sites.clear();
    }
}
