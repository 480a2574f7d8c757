//! Delimiter-balanced body scanning.
//!
//! The engine has no grammar for the language it transforms. Bodies are
//! located by walking the text one character at a time with a depth
//! counter over a configurable delimiter pair. Two body shapes are legal:
//! a delimited block (`{ ... }`), and a single statement terminated by
//! `;` before any delimiter opens. The scanner either resolves a span
//! exactly or fails; it never guesses.

use std::ops::Range;

use crate::error::EngineError;

/// Statement terminator that ends a non-block body.
const TERMINATOR: char = ';';

/// A matched pair of delimiters the scanner balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterPair {
    /// The opening delimiter.
    pub open: char,
    /// The closing delimiter.
    pub close: char,
}

impl DelimiterPair {
    /// Curly braces, the default block delimiters.
    pub const BRACES: Self = Self {
        open: '{',
        close: '}',
    };

    /// Parentheses, used to scan parameter lists and call arguments.
    pub const PARENS: Self = Self {
        open: '(',
        close: ')',
    };
}

/// Options controlling a body scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Whether the body is already open at the anchor (depth starts at 1).
    pub body_started: bool,
    /// Whether to exclude the outermost delimiter pair from the span.
    pub body_only: bool,
    /// The delimiter pair to balance.
    pub delimiters: DelimiterPair,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            body_started: false,
            body_only: false,
            delimiters: DelimiterPair::BRACES,
        }
    }
}

impl ScanOptions {
    /// Options for the delimiter-free interior of a block body.
    #[must_use]
    pub fn interior() -> Self {
        Self {
            body_only: true,
            ..Self::default()
        }
    }

    /// Options for continuing inside an already-open block.
    #[must_use]
    pub fn continuation() -> Self {
        Self {
            body_started: true,
            ..Self::default()
        }
    }
}

/// Scans the body starting at or after `anchor` and returns its span.
///
/// The body begins at the first opening delimiter, or at a statement
/// terminator seen while the depth is still zero; it ends the instant the
/// depth returns to zero. With `body_only` the span excludes the outermost
/// delimiter pair; terminated bodies are returned unchanged (anchor
/// through terminator inclusive) either way.
///
/// # Errors
///
/// Returns [`EngineError::StructuralMismatch`] when the anchor is out of
/// bounds, a closing delimiter appears before the body opens, or the input
/// is exhausted before the body starts and balances.
pub fn scan(source: &str, anchor: usize, options: &ScanOptions) -> Result<Range<usize>, EngineError> {
    let DelimiterPair { open, close } = options.delimiters;
    let tail = source.get(anchor..).ok_or_else(|| {
        EngineError::structural_mismatch(format!("scan anchor {anchor} is out of bounds"))
    })?;

    let mut started = options.body_started;
    let mut depth: usize = usize::from(options.body_started);
    let mut opened_at: Option<usize> = None;

    for (offset, ch) in tail.char_indices() {
        let at = anchor + offset;
        if ch == TERMINATOR && !started && depth == 0 {
            return Ok(anchor..at + TERMINATOR.len_utf8());
        }
        if ch == open {
            if !started {
                started = true;
                opened_at = Some(at);
            }
            depth += 1;
        } else if ch == close {
            depth = depth.checked_sub(1).ok_or_else(|| {
                EngineError::structural_mismatch(format!(
                    "closing delimiter at offset {at} before any body opened"
                ))
            })?;
            if started && depth == 0 {
                return Ok(resolve_span(anchor, at, opened_at, options));
            }
        }
    }

    Err(EngineError::structural_mismatch(if started {
        "input exhausted before the body balanced"
    } else {
        "input exhausted before a body started"
    }))
}

/// Scans the body that follows the first occurrence of `pattern`.
///
/// # Errors
///
/// Returns [`EngineError::PatternNotFound`] (with no method context; see
/// [`EngineError::for_method`]) when the pattern is absent, or any scan
/// failure from [`scan`].
pub fn scan_after(
    source: &str,
    pattern: &str,
    options: &ScanOptions,
) -> Result<Range<usize>, EngineError> {
    let found = source
        .find(pattern)
        .ok_or_else(|| EngineError::pattern_not_found(pattern, ""))?;
    scan(source, found + pattern.len(), options)
}

fn resolve_span(
    anchor: usize,
    close_at: usize,
    opened_at: Option<usize>,
    options: &ScanOptions,
) -> Range<usize> {
    let close = options.delimiters.close;
    match opened_at {
        Some(open_at) if options.body_only => open_at + options.delimiters.open.len_utf8()..close_at,
        Some(open_at) => open_at..close_at + close.len_utf8(),
        // Body was already open at the anchor; the opening delimiter lies
        // outside the scanned text.
        None if options.body_only => anchor..close_at,
        None => anchor..close_at + close.len_utf8(),
    }
}
