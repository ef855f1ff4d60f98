//! Schema module - configuration and result types for disaggregation runs.

mod config;
mod result;

pub use config::*;
pub use result::*;
