use std::error::Error;
use std::fmt;

use pdbg_utilities::write_error_chain;

/// Prints an error with its chain of sources, instead of the derived `Debug`
/// of the error type:
///
/// ```
/// # use std::io;
/// use pdbg::ErrorReport;
///
/// let error = io::Error::other("disk full");
/// let text = pdbg::pdi!(ErrorReport::new(&error));
/// assert!(text.ends_with("  => disk full"));
/// ```
pub struct ErrorReport<'a> {
    error: &'a (dyn Error + 'static),
}

impl<'a> ErrorReport<'a> {
    pub fn new(error: &'a (dyn Error + 'static)) -> Self {
        Self { error }
    }
}

impl fmt::Debug for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_error_chain(f, self.error)
    }
}
