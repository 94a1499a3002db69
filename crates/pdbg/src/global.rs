//! The default debugger that is used by the `pd!` and `pdi!` macros.

use std::fmt;
use std::sync::LazyLock;

use parking_lot::Mutex;

use crate::CallOptions;
use crate::CallSite;
use crate::Debugger;
use crate::Options;
use crate::Printer;

static DEBUGGER: LazyLock<Mutex<Debugger>> = LazyLock::new(|| Mutex::new(Debugger::new(Options::from_env())));

/// Runs `f` with exclusive access to the default debugger. Calling `pd!`
/// from within `f` deadlocks.
pub fn with_debugger<R>(f: impl FnOnce(&mut Debugger) -> R) -> R {
    f(&mut DEBUGGER.lock())
}

/// Changes the options of the default debugger, e.g.
///
/// ```
/// pdbg::configure(|options| options.announcer = "[DBG]".to_string());
/// ```
pub fn configure(f: impl FnOnce(&mut Options)) {
    with_debugger(|debugger| f(debugger.options_mut()));
}

/// Clears the run counters of the default debugger.
pub fn reset() {
    with_debugger(Debugger::reset);
}

// Only the counting and locating happens under the lock. The value, print
// engine, formatter and printer run afterwards and may use `pd!` themselves.

#[doc(hidden)]
pub fn __print(call_site: &CallSite, expression: &str, value: Option<&dyn fmt::Debug>, call: &CallOptions) -> bool {
    match render_unlocked(call_site, expression, value, call) {
        Some((printer, text)) => {
            printer.print(&text);
            true
        }
        None => false,
    }
}

#[doc(hidden)]
pub fn __inspect(
    call_site: &CallSite,
    expression: &str,
    value: Option<&dyn fmt::Debug>,
    call: &CallOptions,
) -> Option<String> {
    render_unlocked(call_site, expression, value, call).map(|(_, text)| text)
}

fn render_unlocked(
    call_site: &CallSite,
    expression: &str,
    value: Option<&dyn fmt::Debug>,
    call: &CallOptions,
) -> Option<(Printer, String)> {
    let prepared = with_debugger(|debugger| debugger.prepare(call_site, expression, call))?;
    Some(prepared.render(value))
}
