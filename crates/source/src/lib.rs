#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod capture;
mod frame;
mod frame_format;
mod locator;
mod source_file;

pub use capture::*;
pub use frame::*;
pub use frame_format::*;
pub use locator::*;
pub use source_file::*;
