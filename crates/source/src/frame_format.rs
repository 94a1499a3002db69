//! Compatibility shim that recovers [StackFrame]s from the text of a stack
//! trace. Prefer supplying structured frames; this is only needed when the
//! trace comes from elsewhere, for example a log file.

use std::sync::LazyLock;

use log::trace;
use regex::Captures;
use regex::Regex;

use crate::StackFrame;
use crate::split_qualified_name;

/// The stack trace layouts that [parse_frame] understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    /// `/app/lib/greeter.rb:12:in 'Greeter#hello'`, also with a backtick as opening quote.
    Ruby,

    /// `0: app::Greeter::hello at ./src/main.rs:12:5`, the symbol and location
    /// of a Rust backtrace frame on a single line.
    Rust,

    /// `at Greeter.hello (/app/greeter.js:12:5)` as printed by V8, or
    /// `at ./src/main.rs:12:5`, the location line of a Rust backtrace.
    At,
}

static RUBY_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?P<file>(?:[A-Za-z]:)?[^:]+):(?P<line>\d+):in [`'](?P<method>[^']+)'\s*$"#)
        .expect("Regex compilation should not fail")
});

static RUST_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:\d+:\s+)?(?P<symbol>\S+) at (?P<file>.+?):(?P<line>\d+)(?::(?P<column>\d+))?\s*$"#)
        .expect("Regex compilation should not fail")
});

static AT_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*at (?:(?P<method>.+?) \()?(?P<file>.+?):(?P<line>\d+)(?::(?P<column>\d+))?\)?\s*$"#)
        .expect("Regex compilation should not fail")
});

/// The symbol line of a Rust backtrace, `  3: app::Greeter::hello`.
static RUST_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*\d+:\s+(?P<symbol>\S.*?)\s*$"#).expect("Regex compilation should not fail"));

impl FrameFormat {
    pub const ALL: [FrameFormat; 3] = [FrameFormat::Ruby, FrameFormat::Rust, FrameFormat::At];

    /// Parses a single line in this format.
    pub fn parse(&self, text: &str) -> Option<StackFrame> {
        match self {
            FrameFormat::Ruby => {
                let captures = RUBY_FRAME.captures(text)?;
                let (class, method) = split_ruby_method(&captures["method"]);
                Some(StackFrame {
                    file: captures["file"].to_string(),
                    line: parse_number(&captures, "line"),
                    column: None,
                    method,
                    class,
                })
            }
            FrameFormat::Rust => {
                let captures = RUST_FRAME.captures(text)?;
                Some(
                    StackFrame {
                        file: captures["file"].to_string(),
                        line: parse_number(&captures, "line"),
                        column: parse_number(&captures, "column"),
                        ..Default::default()
                    }
                    .with_function(&captures["symbol"]),
                )
            }
            FrameFormat::At => {
                let captures = AT_FRAME.captures(text)?;
                let (class, method) = captures
                    .name("method")
                    .map(|method| split_dotted_method(method.as_str()))
                    .unwrap_or((None, None));
                Some(StackFrame {
                    file: captures["file"].to_string(),
                    line: parse_number(&captures, "line"),
                    column: parse_number(&captures, "column"),
                    method,
                    class,
                })
            }
        }
    }
}

/// Parses one line of a stack trace, trying every [FrameFormat] in turn.
/// Returns `None` when no format matches.
pub fn parse_frame(text: &str) -> Option<StackFrame> {
    let frame = FrameFormat::ALL.iter().find_map(|format| format.parse(text));
    if frame.is_none() {
        trace!("Could not parse stack frame {text:?}");
    }
    frame
}

/// Parses a complete stack trace into frames. Handles the two line layout of
/// Rust backtraces, where the symbol is printed on its own numbered line and
/// the location follows on the next line. Lines that are not frames are
/// skipped, as are symbols without a location.
pub fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut frames = Vec::new();
    let mut pending_symbol: Option<&str> = None;

    for line in text.lines() {
        if let Some(mut frame) = parse_frame(line) {
            if frame.method.is_none() {
                if let Some(symbol) = pending_symbol {
                    let (class, method) = split_qualified_name(symbol);
                    frame.class = class;
                    frame.method = method;
                }
            }
            frames.push(frame);
            pending_symbol = None;
        } else if let Some(captures) = RUST_SYMBOL.captures(line) {
            pending_symbol = captures.name("symbol").map(|symbol| symbol.as_str());
        }
    }

    frames
}

fn parse_number(captures: &Captures, name: &str) -> Option<u32> {
    captures.name(name).and_then(|value| value.as_str().parse().ok())
}

/// Ruby methods are written as `Klass#method` or `Klass.method`, possibly
/// prefixed by `block in` for blocks.
fn split_ruby_method(method: &str) -> (Option<String>, Option<String>) {
    let method = method.trim();
    let method = method.rsplit(" in ").next().unwrap_or(method);

    if let Some(index) = method.rfind(['#', '.']) {
        let class = &method[..index];
        let name = &method[index + 1..];
        if !class.is_empty() && !name.is_empty() {
            return (Some(class.to_string()), Some(name.to_string()));
        }
    }

    (None, Some(method.to_string()))
}

/// JavaScript methods are written as `Klass.method`, optionally prefixed by `new` or `async`.
fn split_dotted_method(method: &str) -> (Option<String>, Option<String>) {
    let method = method.trim();
    let method = method
        .strip_prefix("async ")
        .or_else(|| method.strip_prefix("new "))
        .unwrap_or(method);

    match method.rsplit_once('.') {
        Some((class, name)) if !class.is_empty() && !name.is_empty() => (Some(class.to_string()), Some(name.to_string())),
        _ => (None, Some(method.to_string())),
    }
}
