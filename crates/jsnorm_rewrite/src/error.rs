//! Engine defects surfaced as values.

use jsnorm_core::text::TextSpan;
use std::fmt;
use thiserror::Error;

/// An internal invariant the normalizer failed to uphold. Output produced
/// alongside one of these is never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A construct outside the canonical grammar survived the fixpoint.
    #[error("internal invariant violation: {construct} remains after normalization")]
    NonCanonical { construct: String, span: TextSpan },

    /// More rewrites than the termination bound allows.
    #[error("internal invariant violation: normalization did not converge within {bound} rewrites")]
    Diverged { bound: usize },

    /// Re-parsing the emitted text did not reproduce the canonical tree.
    #[error("internal invariant violation: emitted text does not round-trip: {detail}")]
    RoundTrip { detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    NonCanonical,
    Diverged,
    RoundTrip,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::NonCanonical => "non-canonical",
            ViolationKind::Diverged => "diverged",
            ViolationKind::RoundTrip => "round-trip",
        };
        f.write_str(name)
    }
}

impl InvariantViolation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            InvariantViolation::NonCanonical { .. } => ViolationKind::NonCanonical,
            InvariantViolation::Diverged { .. } => ViolationKind::Diverged,
            InvariantViolation::RoundTrip { .. } => ViolationKind::RoundTrip,
        }
    }

    pub fn span(&self) -> Option<TextSpan> {
        match self {
            InvariantViolation::NonCanonical { span, .. } => Some(*span),
            _ => None,
        }
    }
}
