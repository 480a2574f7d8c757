//! Method discovery over a flavour's source buffer.
//!
//! Declarations are found by a single left-to-right pass looking for the
//! corpus declaration keyword followed by an identifier, with the
//! parameter list and body resolved by the delimiter scanner. Nested
//! `func` occurrences inside an already-recorded body belong to the
//! enclosing record and are not indexed separately.

use std::ops::Range;

use crate::error::EngineError;
use crate::scanner::{self, DelimiterPair, ScanOptions};

/// Declaration keyword of the container corpus.
pub const FUNC_KEYWORD: &str = "func";

/// One discovered method: its name and source spans.
///
/// `full_span` covers the whole declaration, `body_span` the body
/// including its delimiters (or the terminated statement), and
/// `inner_span` the delimiter-free interior (equal to `body_span` for
/// terminated bodies). Records are created once per scan and never
/// mutated; the orchestrator supersedes them by splicing replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRecord {
    /// The method's identifier.
    pub name: String,
    /// Byte range of the full declaration.
    pub full_span: Range<usize>,
    /// Byte range of the body, delimiters or terminator included.
    pub body_span: Range<usize>,
    /// Byte range of the body interior, delimiters excluded.
    pub inner_span: Range<usize>,
}

impl MethodRecord {
    /// Returns whether the body is a delimited block (as opposed to a
    /// single terminated statement).
    #[must_use]
    pub const fn has_block_body(&self) -> bool {
        self.inner_span.start > self.body_span.start
    }
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Indexes every top-level method declaration in `source`.
///
/// # Errors
///
/// Returns [`EngineError::StructuralMismatch`] when a declaration's
/// parameter list or body cannot be balanced.
pub fn index_methods(source: &str) -> Result<Vec<MethodRecord>, EngineError> {
    let mut records = Vec::new();
    let mut last_end = 0usize;

    for (start, _) in source.match_indices(FUNC_KEYWORD) {
        if start < last_end || !is_keyword_occurrence(source, start) {
            continue;
        }
        let name_start = skip_whitespace(source, start + FUNC_KEYWORD.len());
        let name_end = scan_identifier(source, name_start);
        if name_end == name_start {
            continue;
        }
        let name = source.get(name_start..name_end).unwrap_or_default();

        let params = scanner::scan(
            source,
            name_end,
            &ScanOptions {
                delimiters: DelimiterPair::PARENS,
                ..ScanOptions::default()
            },
        )?;
        let body_span = scanner::scan(source, params.end, &ScanOptions::default())?;
        let inner_span = interior_of(source, &body_span);

        last_end = body_span.end;
        records.push(MethodRecord {
            name: name.to_owned(),
            full_span: start..body_span.end,
            body_span,
            inner_span,
        });
    }

    Ok(records)
}

/// Returns the interior of a body span: inside the braces for a block,
/// the span itself for a terminated statement.
fn interior_of(source: &str, body_span: &Range<usize>) -> Range<usize> {
    let body = source.get(body_span.clone()).unwrap_or_default();
    if body.starts_with('{') && body.ends_with('}') {
        body_span.start + 1..body_span.end - 1
    } else {
        body_span.clone()
    }
}

fn is_keyword_occurrence(source: &str, start: usize) -> bool {
    let before_ok = source
        .get(..start)
        .and_then(|prefix| prefix.chars().next_back())
        .is_none_or(|c| !is_ident_char(c));
    let after_ok = source
        .get(start + FUNC_KEYWORD.len()..)
        .and_then(|suffix| suffix.chars().next())
        .is_some_and(char::is_whitespace);
    before_ok && after_ok
}

fn skip_whitespace(source: &str, from: usize) -> usize {
    source
        .get(from..)
        .map_or(from, |tail| {
            let skipped: usize = tail
                .chars()
                .take_while(|c| c.is_whitespace())
                .map(char::len_utf8)
                .sum();
            from + skipped
        })
}

fn scan_identifier(source: &str, from: usize) -> usize {
    source.get(from..).map_or(from, |tail| {
        let taken: usize = tail
            .chars()
            .take_while(|c| is_ident_char(*c))
            .map(char::len_utf8)
            .sum();
        from + taken
    })
}
