use thiserror::Error;

/// Errors produced while scanning, parsing, canonicalizing or matching tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid character, misplaced wildcard, unknown subtag, duplicate
    /// singleton or variant, prefix mismatch, or an invalid terminal state.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The scanner was asked for a token after the input was exhausted.
    #[error("no more tokens in buffer")]
    EndOfInput,

    /// The operation needs at least one subtag and there was none.
    #[error("no tag: {0}")]
    NoTag(String),

    /// Registry data could not be read or decoded.
    #[error("registry error: {0}")]
    Registry(String),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax(message.into())
    }

    pub(crate) fn no_tag(message: impl Into<String>) -> Self {
        Error::NoTag(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::syntax("Invalid character for tag: '_'").to_string(),
            "syntax error: Invalid character for tag: '_'"
        );
        assert_eq!(Error::EndOfInput.to_string(), "no more tokens in buffer");
        assert_eq!(
            Error::no_tag("No tags to be truncated.").to_string(),
            "no tag: No tags to be truncated."
        );
    }
}
