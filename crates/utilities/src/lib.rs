#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod debug_trace;
mod error;
mod test_logger;

pub use error::*;
pub use test_logger::*;

#[doc(hidden)]
pub use log as __log;
