//! Errors and results.

use crate::base::wire::{ComposeError, DnameError};
use octseq::builder::ShortBuf;
use std::error;
use std::fmt;
use std::io::{self, Write};
use std::result;

use super::native::NativeError;

//------------ Error --------------------------------------------------------

/// A query through the legacy interface failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// An argument was unacceptable.
    InvalidArgument,

    /// The operation is not implemented.
    NotImplemented,

    /// The answer buffer is too small for the response.
    ///
    /// The buffer contains whatever was written before space ran out.
    ShortBuf,

    /// A domain name cannot be represented in wire format.
    BadName(DnameError),

    /// A record’s data is too long to be represented in wire format.
    LongData,

    /// The native facility failed to answer the query.
    Native(NativeError),
}

impl Error {
    /// Returns the status value the legacy interface reports.
    pub fn status(self) -> i32 {
        -1
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::BadName(ref err) => Some(err),
            Error::Native(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<ComposeError> for Error {
    fn from(error: ComposeError) -> Error {
        match error {
            ComposeError::ShortBuf => Error::ShortBuf,
            ComposeError::BadName(err) => Error::BadName(err),
            ComposeError::LongData => Error::LongData,
        }
    }
}

impl From<ShortBuf> for Error {
    fn from(_: ShortBuf) -> Error {
        Error::ShortBuf
    }
}

impl From<DnameError> for Error {
    fn from(error: DnameError) -> Error {
        Error::BadName(error)
    }
}

impl From<NativeError> for Error {
    fn from(error: NativeError) -> Error {
        Error::Native(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::NotImplemented => f.write_str("not implemented"),
            Error::ShortBuf => f.write_str("answer buffer too small"),
            Error::BadName(ref err) => write!(f, "bad domain name: {}", err),
            Error::LongData => f.write_str("record data too long"),
            Error::Native(ref err) => err.fmt(f),
        }
    }
}

//------------ Result -------------------------------------------------------

pub type Result<T> = result::Result<T, Error>;

//------------ herror -------------------------------------------------------

/// Prints the most recent operating system error to stderr.
///
/// The output is `prefix: message` followed by a line feed, where the
/// message describes the calling thread’s last OS error.
pub fn herror(prefix: &str) {
    let err = io::Error::last_os_error();
    // There is nobody left to report failing to write to stderr to.
    let _ = herror_to(&mut io::stderr().lock(), prefix, &err);
}

/// Writes `prefix: message` for the given error to `target`.
pub fn herror_to<W: Write + ?Sized>(
    target: &mut W,
    prefix: &str,
    err: &io::Error,
) -> io::Result<()> {
    writeln!(target, "{}: {}", prefix, err)
}

//============ Testing ======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Error::from(ComposeError::ShortBuf), Error::ShortBuf);
        assert_eq!(
            Error::from(ComposeError::BadName(DnameError::LongLabel)),
            Error::BadName(DnameError::LongLabel)
        );
        assert_eq!(Error::from(ComposeError::LongData), Error::LongData);
        assert_ne!(Error::LongData, Error::ShortBuf);
        assert_eq!(Error::NotImplemented.status(), -1);
        assert_eq!(
            Error::from(NativeError::NameError).to_string(),
            "name does not exist"
        );
    }

    #[test]
    fn herror_format() {
        let mut out = Vec::new();
        let err = io::Error::new(io::ErrorKind::Other, "connection refused");
        herror_to(&mut out, "lookup", &err).unwrap();
        assert_eq!(out, b"lookup: connection refused\n");
    }
}
