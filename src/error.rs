use thiserror::Error;

/// Errors produced by the diff engine and the unified-diff parser.
///
/// Every fallible entry point in this crate returns `Result<_, Error>`; none
/// of the failure modes below are ever swallowed internally.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input was missing or malformed before any work began.
    ///
    /// Reserved for callers building a [`crate::Patch`] or sequence pair by
    /// hand; the typed slice-based entry points in this crate (`myers::diff`,
    /// `UnifiedDiffReader::parse`) cannot themselves observe a null
    /// argument, but downstream code that assembles inputs dynamically can
    /// still construct and return this variant.
    #[error("argument error: {0}")]
    ArgumentError(String),

    /// The Myers search exhausted its budget (`N + M` rounds) without
    /// reaching the sink `(N, M)`.
    ///
    /// Unreachable for any finite `A`, `B` under Myers' proof; surfaced as a
    /// hard failure rather than a panic so a caller can still log context
    /// before aborting.
    #[error("differentiation failed: search exceeded {max_d} rounds without converging")]
    DifferentiationFailed {
        /// The round budget (`N + M`) that was exhausted.
        max_d: usize,
    },

    /// Path reconstruction visited a node whose kind (snake vs. diff)
    /// contradicted what the walker expected at that point in the chain.
    #[error("invariant violation during path reconstruction: {0}")]
    InvariantViolation(String),

    /// A line appeared where the unified-diff state machine required a
    /// header line or a body line and got neither.
    #[error("unified diff parse error at line {line_number}: {message} ({line:?})")]
    UnifiedDiffParseError {
        /// 1-based line number within the parsed stream.
        line_number: usize,
        /// The offending line, verbatim.
        line: String,
        /// Human-readable description of what was expected.
        message: String,
    },

    /// Propagated verbatim from the character stream backing the parser.
    #[error("i/o error: {0}")]
    IOError(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
