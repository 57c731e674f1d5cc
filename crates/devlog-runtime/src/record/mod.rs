//! Lifecycle record for the running instance.
//!
//! The record is what lets the next instance find and stop this one.
//! Written once after bind, read once by the successor.

mod io;

pub use io::{delete_pid, read_pid, read_port, write_pid, write_port};
