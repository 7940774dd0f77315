//! The `errors` module defines the common error types.

use std::error;
use std::fmt;
use std::io;

use super::Result;

/// `Error` is the set of failures that can interrupt parsing or
/// decompression before a `VerifyInfo` record can be produced.
///
/// Invariant violations (ordering, permutation, canonical-float, Merkle,
/// metadata) are never represented here: the verifier always records
/// those as boolean fields on the result record instead of raising them
/// as errors.
#[derive(Debug)]
pub enum Error {
    /// The input file could not be opened or read.
    IoError(io::Error),
    /// The stream contained malformed data: bad magic or version, a
    /// short read, a decompression failure, an oversize length, or an
    /// invalid predictor order.
    Malformed(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::Malformed(ref msg) => write!(f, "malformed PCMP stream: {}", msg),
        }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        match *self {
            Error::IoError(ref err) => Some(err),
            Error::Malformed(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

/// function to create a malformed-stream error.
pub fn malformed<T>(desc: &'static str) -> Result<T> {
    Err(Error::Malformed(desc))
}
