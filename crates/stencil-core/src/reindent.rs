//! Structural reindentation.
//!
//! Splicing specialized bodies destroys the original whitespace
//! alignment, so indentation is recomputed from scratch: a single pass
//! tracks nesting depth from the delimiters at line edges and rewrites
//! each line's leading whitespace. Reindenting already-correct text is a
//! no-op.

/// Spaces added per nesting level.
const INDENT_STEP: usize = 2;

const OPENERS: &[char] = &['{', '[', '('];
const CLOSERS: &[char] = &['}', ']', ')'];

/// Recomputes the indentation of every line from structural nesting.
///
/// Depth grows by one step when a line ends immediately after an opening
/// delimiter and shrinks when a line begins with a closing one. Existing
/// leading whitespace is discarded; blank lines stay empty.
#[must_use]
pub fn reindent(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut depth = 0usize;
    let mut first = true;

    for line in source.split('\n') {
        if !first {
            out.push('\n');
        }
        first = false;

        let content = line.trim_start();
        if content.is_empty() {
            continue;
        }
        if content.starts_with(CLOSERS) {
            depth = depth.saturating_sub(INDENT_STEP);
        }
        for _ in 0..depth {
            out.push(' ');
        }
        out.push_str(content);
        if content.trim_end().ends_with(OPENERS) {
            depth += INDENT_STEP;
        }
    }

    out
}
