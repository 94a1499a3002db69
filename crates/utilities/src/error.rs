use std::backtrace::Backtrace;
use std::backtrace::BacktraceStatus;
use std::error::Error;
use std::fmt;
use std::iter;

/// Catch-all error of the pdbg tools. Any [Error] converts into it with `?`,
/// a backtrace is captured at that point and printed by the `Debug` output,
/// which is what `main` reports when it returns an error.
pub struct PdbgError {
    inner: Box<Inner>,
}

struct Inner {
    error: Box<dyn Error + Send + Sync + 'static>,
    backtrace: Backtrace,
}

impl PdbgError {
    /// Returns the wrapped error when it is of type `E`.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.error.downcast_ref::<E>()
    }

    /// The wrapped error followed by its sources, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        error_chain(self.inner.error.as_ref())
    }
}

/// Iterates over `error` and its [Error::source]s, outermost first.
pub fn error_chain<'a>(error: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    iter::successors(Some(error), |&error| error.source())
}

/// Writes `error` followed by a numbered `Caused by:` section for its sources.
pub fn write_error_chain(f: &mut fmt::Formatter<'_>, error: &(dyn Error + 'static)) -> fmt::Result {
    write!(f, "{error}")?;
    for (index, cause) in error_chain(error).skip(1).enumerate() {
        if index == 0 {
            write!(f, "\n\nCaused by:")?;
        }
        write!(f, "\n    {index}: {cause}")?;
    }
    Ok(())
}

// The bound also admits `&str` and `String`.
impl<E> From<E> for PdbgError
where
    Box<dyn Error + Send + Sync + 'static>: From<E>,
{
    #[cold]
    fn from(error: E) -> Self {
        PdbgError {
            inner: Box::new(Inner {
                error: error.into(),
                backtrace: Backtrace::capture(),
            }),
        }
    }
}

impl fmt::Display for PdbgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.error)
    }
}

impl fmt::Debug for PdbgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_error_chain(f, self.inner.error.as_ref())?;
        if self.inner.backtrace.status() == BacktraceStatus::Captured {
            write!(f, "\n\n{}", self.inner.backtrace)?;
        }
        Ok(())
    }
}
