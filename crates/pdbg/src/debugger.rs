use std::fmt;
use std::path::Path;

use log::trace;
use pdbg_run::CallSiteKey;
use pdbg_run::RunRegistry;
use pdbg_source::SourceFrame;
use pdbg_source::SourceLocator;
use pdbg_source::StackFrame;
use pdbg_source::callers_of;
use pdbg_source::capture_stack;
use pdbg_source::with_ancestors;
use pdbg_utilities::debug_trace;

use crate::CallOptions;
use crate::CallerDepth;
use crate::Formatter;
use crate::Options;
use crate::PrintData;
use crate::PrintEngine;
use crate::Printer;
use crate::extract_expression;

/// The location of a `pd!` invocation, filled in at compile time by [crate::call_site!].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
    /// Qualified path of the enclosing function, e.g. `app::Greeter::hello`.
    pub function: &'static str,
    /// Manifest directory of the calling crate, used to find `file` on disk.
    pub manifest_dir: Option<&'static str>,
}

impl CallSite {
    pub fn key(&self) -> CallSiteKey {
        CallSiteKey::new(self.file, self.line)
    }

    pub fn stack_frame(&self) -> StackFrame {
        StackFrame::new(self.file, self.line)
            .with_column(self.column)
            .with_function(self.function)
    }
}

/// Ties the run determiner and source locator together behind a single print
/// call. A debugger is owned by its caller; the `pd!` macros use a shared
/// default instance, see [crate::with_debugger].
#[derive(Debug, Default)]
pub struct Debugger {
    options: Options,
    registry: RunRegistry,
}

impl Debugger {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            registry: RunRegistry::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn registry(&self) -> &RunRegistry {
        &self.registry
    }

    /// Clears all run counters, the options are kept.
    pub fn reset(&mut self) {
        self.registry.reset();
    }

    /// Counts the call and, when it should print, collects everything about
    /// it except the rendered value. Only a selector that applies to the call
    /// advances a counter: a per call `run_at` is counted for the call site,
    /// the global `run_at` on the global counter.
    ///
    /// No user code runs here, the value, print engine and formatter are only
    /// touched by [PreparedPrint::render].
    pub fn prepare(&mut self, call_site: &CallSite, expression: &str, call: &CallOptions) -> Option<PreparedPrint> {
        let (selector, key) = match &call.run_at {
            Some(selector) => (Some(selector), Some(call_site.key())),
            None => (self.options.run_at.as_ref(), None),
        };

        let run_number = match selector {
            Some(selector) => {
                let decision = self.registry.determine(Some(selector), key.as_ref());
                if !decision.run {
                    debug_trace!("Skipping run {} of {}:{}", decision.run_number, call_site.file, call_site.line);
                    return None;
                }
                Some(decision.run_number)
            }
            None => None,
        };

        let options = self.options.merged(call);
        let locator = SourceLocator::new()
            .with_app_path(options.app_path.clone())
            .with_source_line_count(options.source_line_count);
        let roots = call_site
            .manifest_dir
            .map(|dir| with_ancestors(Path::new(dir)))
            .unwrap_or_default();
        let source = locator.locate_frame(&call_site.stack_frame(), &roots);

        let caller = match options.caller {
            CallerDepth::Off => Vec::new(),
            depth => caller_lines(&locator, call_site, depth.limit()),
        };

        let expression =
            extract_expression(&source.source_text, Some(call_site.column)).unwrap_or_else(|| expression.to_string());
        trace!("Preparing debug print at {}:{}", source.file, call_site.line);

        Some(PreparedPrint {
            data: PrintData {
                announcer: options.announcer,
                expression,
                run_number,
                caller,
                header: options.header.resolve('>'),
                wrapper: options.wrapper.resolve('*'),
                footer: options.footer.resolve('<'),
                ..print_data_from(source)
            },
            printer: options.printer,
            print_engine: options.print_engine,
            formatter: options.formatter,
        })
    }

    /// Counts the call and, when it should print, renders it. Returns the
    /// printer to use together with the text.
    pub fn render(
        &mut self,
        call_site: &CallSite,
        expression: &str,
        value: Option<&dyn fmt::Debug>,
        call: &CallOptions,
    ) -> Option<(Printer, String)> {
        self.prepare(call_site, expression, call)
            .map(|prepared| prepared.render(value))
    }

    /// Renders and emits a call, returns whether anything was printed.
    pub fn print(
        &mut self,
        call_site: &CallSite,
        expression: &str,
        value: Option<&dyn fmt::Debug>,
        call: &CallOptions,
    ) -> bool {
        match self.render(call_site, expression, value, call) {
            Some((printer, text)) => {
                printer.print(&text);
                true
            }
            None => false,
        }
    }

    /// Returns the text that [Debugger::print] would emit, without emitting it.
    pub fn inspect(
        &mut self,
        call_site: &CallSite,
        expression: &str,
        value: Option<&dyn fmt::Debug>,
        call: &CallOptions,
    ) -> Option<String> {
        self.render(call_site, expression, value, call).map(|(_, text)| text)
    }
}

/// A call that passed its run selector, waiting for its value to be rendered.
#[derive(Clone, Debug)]
pub struct PreparedPrint {
    data: PrintData,
    printer: Printer,
    print_engine: PrintEngine,
    formatter: Formatter,
}

impl PreparedPrint {
    pub fn data(&self) -> &PrintData {
        &self.data
    }

    /// Renders the value with the print engine and lays out the print out.
    pub fn render(mut self, value: Option<&dyn fmt::Debug>) -> (Printer, String) {
        self.data.value = value
            .map(|value| self.print_engine.render(value))
            .unwrap_or_default();
        let text = self.formatter.format(&self.data);
        (self.printer, text)
    }
}

fn print_data_from(source: SourceFrame) -> PrintData {
    PrintData {
        file: source.file,
        line_number: source.line_number,
        class: source.class,
        method: source.method,
        source_text: source.source_text,
        ..Default::default()
    }
}

/// Formats the frames that called the call site, at most `limit` of them.
fn caller_lines(locator: &SourceLocator, call_site: &CallSite, limit: usize) -> Vec<String> {
    let stack = capture_stack();
    callers_of(&stack, call_site.file, call_site.line)
        .iter()
        .take(limit)
        .map(|frame| {
            StackFrame {
                file: locator.display_path(&frame.file, Some(Path::new(&frame.file))),
                ..frame.clone()
            }
            .to_string()
        })
        .collect()
}
