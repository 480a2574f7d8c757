//! Error types for the specialization engine.
//!
//! Every failure in this crate is fatal for the flavour being processed:
//! the transformation is a pure function of its input, so a failed run
//! cannot succeed on retry without a source edit. The variants mirror the
//! three ways a run can go wrong (a body that never balances, a rewrite
//! rule whose anchor is missing, a template that was never captured) plus
//! an internal-invariant variant for postcondition breakage.

use thiserror::Error;

/// Errors from scanning, rewriting, and specialization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The scanner exhausted its input before a body started or balanced.
    #[error("structural mismatch: {message}")]
    StructuralMismatch {
        /// Description of the unbalanced or missing structure.
        message: String,
    },

    /// A rewrite rule's anchor pattern is absent from the text it expects
    /// to transform. Rules never degrade to a no-op.
    #[error("pattern '{pattern}' not found while specialising '{method}'")]
    PatternNotFound {
        /// The anchor text the rule searched for.
        pattern: String,
        /// The method being specialized when the anchor went missing.
        method: String,
    },

    /// A method requires a template that was never captured, or a bound
    /// name has no field-index entry.
    #[error("template mismatch: {message}")]
    TemplateMismatch {
        /// Description of the missing template or field.
        message: String,
    },

    /// An internal invariant broke, such as a residual placeholder token
    /// surviving a full rule pipeline.
    #[error("internal error: {message}")]
    InternalError {
        /// Description of the broken invariant.
        message: String,
    },
}

impl EngineError {
    /// Creates a structural mismatch error.
    #[must_use]
    pub fn structural_mismatch(message: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            message: message.into(),
        }
    }

    /// Creates a pattern-not-found error.
    #[must_use]
    pub fn pattern_not_found(pattern: impl Into<String>, method: impl Into<String>) -> Self {
        Self::PatternNotFound {
            pattern: pattern.into(),
            method: method.into(),
        }
    }

    /// Creates a template mismatch error.
    #[must_use]
    pub fn template_mismatch(message: impl Into<String>) -> Self {
        Self::TemplateMismatch {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Fills in the method context on a [`EngineError::PatternNotFound`]
    /// raised below the level that knows which method is being processed.
    ///
    /// Other variants pass through unchanged.
    #[must_use]
    pub fn for_method(self, method: &str) -> Self {
        match self {
            Self::PatternNotFound { pattern, method: m } if m.is_empty() => Self::PatternNotFound {
                pattern,
                method: method.to_owned(),
            },
            other => other,
        }
    }
}
