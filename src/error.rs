//! Error type shared by the native surface and the navigator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[cfg(windows)]
    #[error("windows api call failed: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("{0} is not available on this system")]
    Unsupported(&'static str),

    #[error("shell rejected {operation}: {reason}")]
    Rejected { operation: &'static str, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Error::Rejected { operation, reason: reason.into() }
    }
}

/// Turns a `BOOL`-style "did it work" flag into a `Result`, picking up the
/// thread's last error on failure.
#[cfg(windows)]
pub(crate) fn check_bool(ok: bool) -> Result<()> {
    if ok { Ok(()) } else { Err(Error::Windows(windows::core::Error::from_win32())) }
}
