use thiserror::Error;

/// Errors reported when selecting variables by argument position.
///
/// Numeric domain errors are not errors here: NaN and infinities propagate
/// through evaluation exactly as in plain float arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A `wrt` position does not name one of the call arguments.
    #[error("argument index {index} out of range for {len} arguments")]
    ArgumentOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
