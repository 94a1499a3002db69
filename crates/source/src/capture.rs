use backtrace::Backtrace;
use log::debug;

use crate::StackFrame;

/// Symbols of frames that belong to the capturing machinery itself.
const INTERNAL_PREFIXES: [&str; 4] = [
    "backtrace::",
    "<backtrace::",
    "pdbg_source::capture::capture_stack",
    "pdbg_source::locator::SourceLocator::locate_current",
];

/// Captures the current call stack as structured frames, innermost first,
/// with the frames of the capturing code removed.
///
/// Frames without debug information (no file name) are left out, so without
/// debug info the result may be empty.
#[inline(never)]
pub fn capture_stack() -> Vec<StackFrame> {
    let backtrace = Backtrace::new();
    let mut frames = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            let Some(file) = symbol.filename() else {
                continue;
            };

            let name = symbol.name().map(|name| format!("{name:#}"));
            if name
                .as_deref()
                .is_some_and(|name| INTERNAL_PREFIXES.iter().any(|prefix| name.starts_with(prefix)))
            {
                continue;
            }

            let mut stack_frame = StackFrame {
                file: file.display().to_string(),
                line: symbol.lineno(),
                column: symbol.colno(),
                ..Default::default()
            };
            if let Some(name) = name {
                stack_frame = stack_frame.with_function(&name);
            }
            frames.push(stack_frame);
        }
    }

    if frames.is_empty() {
        debug!("Captured a stack without debug information");
    }
    frames
}

/// Returns the frames that called the given call site, i.e. everything after
/// the first frame located at `file:line`. The file is compared by suffix,
/// since backtraces report absolute paths where `file!()` is relative.
///
/// Returns an empty slice when the call site is not on the stack.
pub fn callers_of<'a>(stack: &'a [StackFrame], file: &str, line: u32) -> &'a [StackFrame] {
    let file = normalize_separators(file);
    let file = file.trim_start_matches("./");

    stack
        .iter()
        .position(|frame| frame.line == Some(line) && normalize_separators(&frame.file).ends_with(file))
        .map(|index| &stack[index + 1..])
        .unwrap_or(&[])
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}
