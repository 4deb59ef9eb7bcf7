//! Enumeration of network interfaces to collect counters for.
//!
//! [`ProcNetDev`] lists the interfaces found in `/proc/net/dev`, skipping its two
//! header lines. [`StaticInterfaces`] returns a fixed list.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Errors that may occur while enumerating interfaces.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open file `{path}`: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read line for file `{path}`: {source}")]
    ReadLine {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Supplies the ordered list of interface names for one collection pass.
pub trait InterfaceSource {
    /// Returns the interface names, in the order they should be collected.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the list cannot be obtained. The whole pass is
    /// skipped in that case.
    fn interfaces(&self) -> Result<Vec<String>>;
}

/// Lists interfaces from a `/proc/net/dev` style file.
#[derive(Debug, Clone)]
pub struct ProcNetDev {
    path: PathBuf,
}

impl ProcNetDev {
    /// Creates a source reading the given `/proc/net/dev` style file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `<proc_root>/net/dev`.
    pub fn from_proc_root(proc_root: impl AsRef<Path>) -> Self {
        Self::new(proc_root.as_ref().join("net/dev"))
    }
}

impl InterfaceSource for ProcNetDev {
    fn interfaces(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|source| Error::FileOpen {
            path: self.path.clone(),
            source,
        })?;

        interfaces_from_reader(BufReader::new(file)).map_err(|source| Error::ReadLine {
            path: self.path.clone(),
            source,
        })
    }
}

/// A fixed, externally supplied interface list.
#[derive(Debug, Clone, Default)]
pub struct StaticInterfaces(Vec<String>);

impl StaticInterfaces {
    /// Wraps `names`, returned as given on every pass.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl InterfaceSource for StaticInterfaces {
    fn interfaces(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Extracts the interface name of a single `/proc/net/dev` data line.
fn parse_interface_name(line: &str) -> Option<&str> {
    let (iface, _) = line.trim().split_once(':')?;
    let iface = iface.trim();
    (!iface.is_empty()).then_some(iface)
}

/// Collects the interface names of a `/proc/net/dev` style reader.
///
/// The two header lines are skipped, malformed lines are ignored and each
/// name is returned once, in file order.
fn interfaces_from_reader<R: BufRead>(mut buf: R) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut line = String::new();

    // Skip headers (first two lines)
    for _ in 0..2 {
        buf.read_line(&mut line)?;
        line.clear();
    }

    while buf.read_line(&mut line)? != 0 {
        if let Some(iface) = parse_interface_name(&line) {
            if !names.iter().any(|n| n == iface) {
                names.push(iface.to_owned());
            }
        }
        line.clear();
    }

    Ok(names)
}
