use thiserror::Error;

/// Everything that can go wrong calling into a [`Tree`](crate::Tree).
///
/// Public entry points never panic on caller-supplied bad input; they
/// return one of these instead, and leave the input tree completely
/// unmodified (per spec.md §7's propagation rule).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid tree configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("extension not configured for this tree")]
    ExtensionUnavailable,

    #[error("concat of trees with incompatible extension configuration")]
    IncompatibleExtension,

    /// Returned by [`Tree::check`](crate::Tree::check) on the first
    /// structural invariant it finds violated (spec.md §4.8). `check` is
    /// the test-time verifier tests assert against directly, so it
    /// always reports this as an ordinary `Result` rather than panicking,
    /// in every build profile.
    #[error("internal invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type Result<T> = std::result::Result<T, TreeError>;
