pub mod verbosity;
pub mod version;

pub use verbosity::*;
pub use version::*;
