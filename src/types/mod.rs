//! Type definitions for azcost

mod error;
mod rates;
mod usage;

pub use error::*;
pub use rates::*;
pub use usage::*;
