use thiserror::Error;

/// Errors raised while loading puzzle input or running a solver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// A line could not be parsed (line numbers are 1-based)
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The input contained nothing to work on
    #[error("input is empty")]
    EmptyInput,

    /// A run asked for more than the data can provide
    #[error("insufficient data: requested {requested} {what}, only {available} available")]
    InsufficientData {
        what: &'static str,
        requested: usize,
        available: usize,
    },

    /// Two consecutive tiles of a loop do not share a row or column
    #[error("tiles on lines {from} and {to} are not on the same row or column")]
    NotAxisAligned { from: usize, to: usize },

    /// A region lists a present shape that was never defined
    #[error("line {line}: unknown present shape {index}")]
    UnknownShape { line: usize, index: usize },

    /// A worksheet problem uses an operator other than `+` or `*`
    #[error("unknown operator '{0}'")]
    UnknownOperator(char),

    /// A result does not fit in 64 bits
    #[error("{what} does not fit in 64 bits")]
    Overflow { what: &'static str },
}

impl PuzzleError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        PuzzleError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = PuzzleError::malformed(3, "expected 3 coordinates, found 2");
        assert_eq!(err.to_string(), "line 3: expected 3 coordinates, found 2");

        let err = PuzzleError::InsufficientData {
            what: "links",
            requested: 11,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: requested 11 links, only 10 available"
        );

        let err = PuzzleError::Overflow { what: "grand total" };
        assert_eq!(err.to_string(), "grand total does not fit in 64 bits");
    }
}
