//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod convert;
pub mod dump;
pub mod generate;
