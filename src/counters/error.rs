use std::path::PathBuf;

/// Errors that may occur while reading a counter pseudo-file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("counter source `{path}` is unavailable: {source}")]
    SourceUnavailable {
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

/// The counter sequence is too short to contain both traffic counters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("insufficient counter data for `{scope}`: found {found} entries, need {required}")]
pub struct InsufficientData {
    pub scope: String,
    pub found: usize,
    pub required: usize,
}
