use std::io;

use thiserror::Error;

/// Failure while bringing a source file into memory.
///
/// Load failures never abort the process; they surface as an absent unit and
/// are folded into the batch failure flag by the caller.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open file: {0}")]
    Open(io::Error),
    #[error("cannot read file: {0}")]
    Read(io::Error),
    #[error("cannot allocate {bytes} bytes for source buffer")]
    Allocation { bytes: usize },
}

/// Unified error type for the Oleander console driver.
#[derive(Debug, Error)]
pub enum OleanderError {
    #[error("parsing failed for one or more batch inputs")]
    BatchParseFailed,
    #[error("execution halted before the batch completed")]
    BatchExecutionFailed,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, OleanderError>;
