//! Atomic lifecycle record I/O.
//!
//! Format: two single-value text files
//! ```text
//! pid.txt   <pid>
//! port.txt  <port>
//! ```
//!
//! Each file is written on its own so that one of them being unreadable
//! never invalidates the other.

use std::ffi::OsString;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use devlog_core::DevLogPaths;

/// Write the pid record atomically.
pub fn write_pid(paths: &DevLogPaths, pid: u32) -> io::Result<PathBuf> {
    let path = paths.pid_file();
    write_scalar(&path, pid)?;
    Ok(path)
}

/// Read the pid record.
///
/// Returns `NotFound` when no record exists and `InvalidData` when the
/// record is not a decimal process id.
pub fn read_pid(paths: &DevLogPaths) -> io::Result<u32> {
    read_scalar(&paths.pid_file(), "PID")
}

/// Delete the pid record (idempotent - no error if missing).
pub fn delete_pid(paths: &DevLogPaths) -> io::Result<()> {
    match fs::remove_file(paths.pid_file()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Write the port record atomically.
pub fn write_port(paths: &DevLogPaths, port: u16) -> io::Result<PathBuf> {
    let path = paths.port_file();
    write_scalar(&path, port)?;
    Ok(path)
}

/// Read the port record.
pub fn read_port(paths: &DevLogPaths) -> io::Result<u16> {
    read_scalar(&paths.port_file(), "port")
}

/// Write `value` to `<path>.tmp`, then rename it over `path`.
fn write_scalar(path: &Path, value: impl Display) -> io::Result<()> {
    let mut temp_name = OsString::from(path.as_os_str());
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, value.to_string())?;
    fs::rename(&temp_path, path)
}

fn read_scalar<T: FromStr>(path: &Path, what: &str) -> io::Result<T> {
    let content = fs::read_to_string(path)?;
    parse_scalar(&content, what)
}

fn parse_scalar<T: FromStr>(content: &str, what: &str) -> io::Result<T> {
    content.trim().parse::<T>().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("missing or invalid {what}"),
        )
    })
}
