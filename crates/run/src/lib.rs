#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod registry;
mod selector;

pub use registry::*;
pub use selector::*;
