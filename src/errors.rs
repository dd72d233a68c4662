use std::fmt;

/// Crate-wide result alias for the handful of operations that can fail for
/// reasons outside the three validation/capacity/invariant classes the core
/// otherwise handles with plain `bool`/`Option` returns.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the boundary operations that are not total over their
/// documented inputs (currently just modifier-spec parsing, which stands in
/// for an out-of-scope config file format).
///
/// Constructed directly at the failure site as `Error::InvalidConfig(format!("{}: ...",
/// function_name!()))`, the same way the callers this was ported from stamp
/// their own errors, rather than through a shared constructor — that way the
/// captured name is always the function that actually failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The supplied configuration could not be used as given.
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
