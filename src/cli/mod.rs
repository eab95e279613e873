//! Command-line interface module.
//!
//! Provides argument parsing, the report command and its renderer.

pub mod args;
pub mod commands;
pub mod report;
