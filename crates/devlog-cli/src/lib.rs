//! Command-line interface for the dev-log collector.
//!
//! The binary lives in `main.rs`; argument parsing is exposed here so it can
//! be tested without spawning a process.

#![deny(unsafe_code)]

pub mod parser;

pub use parser::Cli;
