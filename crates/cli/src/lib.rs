//! StepForge CLI
//!
//! Command-line front end: configuration file, logging setup, file I/O
//! and human or machine-readable output around the synthesis engine.

pub mod commands;
pub mod config;
pub mod output;
