use thiserror::Error;

//=====================================================================
// Error taxonomy for the loading phase.
//
// Every variant is fatal: a library that cannot be decoded, a graph
// that fails a structural check, or data that overruns a configured
// ceiling all leave the loader in a state no simulation can safely
// start from. Recoverable data-quality problems (out-of-range cosines,
// absurd multiplicities) are never errors; they are corrected at the
// point of detection and reported through the log facade.
//=====================================================================

#[derive(Debug, Error)]
pub enum GraceError {
    // The source file does not match the expected table shape: missing
    // identifier, truncated payload, malformed control arrays.
    #[error("ACE format error: {0}")]
    Format(String),

    // A derived structure failed a consistency check. This indicates a
    // bug in the graph builder, not bad input.
    #[error("reaction graph invariant violated: {0}")]
    Invariant(String),

    // A count exceeded a fixed ceiling. Silently truncating would
    // change physics results without warning, so this is fatal.
    #[error("configured limit exceeded: {0}")]
    Limit(String),
}

impl GraceError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        GraceError::Format(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        GraceError::Invariant(msg.into())
    }

    pub(crate) fn limit(msg: impl Into<String>) -> Self {
        GraceError::Limit(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GraceError::format("identifier 1100.00c not found");
        assert_eq!(
            format!("{}", err),
            "ACE format error: identifier 1100.00c not found"
        );

        let err = GraceError::invariant("branch parent does not resolve");
        assert!(format!("{}", err).starts_with("reaction graph invariant"));

        let err = GraceError::limit("21 fixed branch entries, ceiling is 20");
        assert!(format!("{}", err).starts_with("configured limit"));
    }
}
