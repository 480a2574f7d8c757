//! Identifier-walking helpers shared across rewrite passes.
//!
//! Rewrites operate on whole identifiers, never on substrings: `key`
//! must not match inside `keyParam`, and an identifier reached through a
//! field access (`map.body`) is a projection base, not a bare use. This
//! module centralises those rules so every pass agrees on them.

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Rewrites identifiers in `text` through `map`.
///
/// `map` receives each identifier together with whether it is reached
/// through a `.` field access; returning `None` keeps the identifier
/// unchanged. Everything between identifiers is copied verbatim. The
/// rewrite is a single simultaneous pass, so swapping a pair of names
/// through `map` is an involution.
pub(crate) fn replace_identifiers(
    text: &str,
    mut map: impl FnMut(&str, bool) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut after_dot = false;

    while let Some((_, ch)) = chars.next() {
        if is_ident_start(ch) {
            let mut ident = String::new();
            ident.push(ch);
            while let Some((_, c)) = chars.peek().copied() {
                if !is_ident_char(c) {
                    break;
                }
                ident.push(c);
                chars.next();
            }
            match map(&ident, after_dot) {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(&ident),
            }
            after_dot = false;
            continue;
        }
        out.push(ch);
        after_dot = ch == '.';
    }

    out
}

/// Counts bare (not field-accessed) occurrences of `name` in `text`.
pub(crate) fn count_bare_identifier(text: &str, name: &str) -> usize {
    let mut count = 0usize;
    let _ = replace_identifiers(text, |ident, after_dot| {
        if !after_dot && ident == name {
            count += 1;
        }
        None
    });
    count
}

/// Returns whether `text` contains `name` as a whole identifier.
pub(crate) fn contains_identifier(text: &str, name: &str) -> bool {
    count_bare_identifier(text, name) > 0
}

/// Returns the byte offset of the first whole-identifier occurrence of
/// `name` at or after `from`.
pub(crate) fn find_identifier(text: &str, name: &str, from: usize) -> Option<usize> {
    let tail = text.get(from..)?;
    let mut search = 0usize;
    while let Some(found) = tail.get(search..).and_then(|rest| rest.find(name)) {
        let at = search + found;
        let before_ok = tail
            .get(..at)
            .and_then(|prefix| prefix.chars().next_back())
            .is_none_or(|c| !is_ident_char(c) && c != '.');
        let after_ok = tail
            .get(at + name.len()..)
            .and_then(|suffix| suffix.chars().next())
            .is_none_or(|c| !is_ident_char(c));
        if before_ok && after_ok {
            return Some(from + at);
        }
        search = at + name.len();
    }
    None
}
