//! Hot path tracing for the pdbg crates. The traces are compiled out unless the
//! `pdbg_debug-trace` feature is enabled, since the macros run on every call.

/// Emits a `log::trace!` message under the `pdbg` target when the
/// `pdbg_debug-trace` feature is enabled, and nothing otherwise.
///
/// # Examples
///
/// ```
/// use pdbg_utilities::debug_trace;
///
/// let run_number = 3;
/// debug_trace!("Call site reached run {run_number}");
/// ```
#[macro_export]
#[cfg(feature = "pdbg_debug-trace")]
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        {
            $crate::__log::trace!(target: "pdbg", $($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "pdbg_debug-trace"))]
macro_rules! debug_trace {
    ($($arg:tt)*) => {{
        // Still type check the arguments, without evaluating them.
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}
