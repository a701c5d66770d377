//! CLI library components for the parameter-set tool.

pub mod commands;
pub mod logging;
