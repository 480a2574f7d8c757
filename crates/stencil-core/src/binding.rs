//! Destructuring-binding rewriter.
//!
//! Generic bodies bind entity fields by name (`let (links, key, value,
//! hash) = entry;`) so one helper can serve every call site. The
//! specialized bodies pay for that indirection, so the rewriter deletes
//! each binding and projects every bound use through its fixed tuple
//! position (`entry.0`, `entry.1`, ...). Substitution is limited to the
//! binding's own structural scope; names used outside it are untouched.

use std::ops::Range;

use crate::error::EngineError;
use crate::fields::FieldIndexTable;
use crate::scanner::{self, DelimiterPair, ScanOptions};
use crate::tokens;

/// Rewrites every entity destructuring in `body` into positional
/// projections.
///
/// `body` is a body interior (outer delimiters excluded); the whole text
/// is treated as one enclosing scope. Bindings whose right-hand side does
/// not denote a known entity are left alone. A binding of an entity
/// accessed through a receiver (`map.body`) introduces an alias
/// (`let body = map.body;`); if the alias ends up used exactly once, it
/// is inlined at its single use.
///
/// # Errors
///
/// Returns [`EngineError::TemplateMismatch`] when a bound name has no
/// field-index entry, and [`EngineError::StructuralMismatch`] when a
/// binding statement or its scope cannot be resolved.
pub fn rewrite_bindings(body: &str, table: &FieldIndexTable) -> Result<String, EngineError> {
    let mut text = format!("{{{body}}}");
    let mut from = 0usize;

    while let Some(binding) = find_binding(&text, from)? {
        let Some(resolved) = table.entity_for_rhs(&binding.rhs) else {
            from = binding.stmt_span.end;
            continue;
        };
        let entity = resolved.entity.to_owned();
        let substitutions = bound_fields(&binding, &entity, table)?;

        let rhs = binding.rhs.clone();
        let stmt_start = binding.stmt_span.start;
        let replacement = if resolved.needs_alias {
            format!("let {entity} = {rhs};")
        } else {
            String::new()
        };
        let stmt_span = if replacement.is_empty() {
            expand_to_line(&text, &binding.stmt_span)
        } else {
            binding.stmt_span.clone()
        };
        let scope_start = stmt_span.start + replacement.len();
        text.replace_range(stmt_span, &replacement);

        apply_in_scope(&mut text, scope_start, |scope| {
            tokens::replace_identifiers(scope, |ident, after_dot| {
                if after_dot {
                    return None;
                }
                substitutions
                    .iter()
                    .find(|(name, _)| name.as_str() == ident)
                    .map(|(_, index)| format!("{entity}.{index}"))
            })
        })?;

        if resolved.needs_alias {
            inline_single_use_alias(&mut text, stmt_start, scope_start, &entity, &rhs)?;
        }
        from = stmt_start;
    }

    Ok(unwrap_block(&text))
}

/// One parsed `let ( ... ) = rhs ;` statement.
#[derive(Debug)]
struct BindingStatement {
    stmt_span: Range<usize>,
    names: Vec<String>,
    rhs: String,
}

/// Finds the next destructuring binding at or after `from`.
fn find_binding(text: &str, from: usize) -> Result<Option<BindingStatement>, EngineError> {
    let mut search = from;
    while let Some(let_at) = tokens::find_identifier(text, "let", search) {
        let after_let = let_at + "let".len();
        let paren_at = skip_whitespace(text, after_let);
        if !text.get(paren_at..).is_some_and(|t| t.starts_with('(')) {
            search = after_let;
            continue;
        }

        let names_span = scanner::scan(
            text,
            paren_at,
            &ScanOptions {
                delimiters: DelimiterPair::PARENS,
                ..ScanOptions::default()
            },
        )?;
        let names = text
            .get(names_span.start + 1..names_span.end - 1)
            .unwrap_or_default()
            .split(',')
            .map(|name| name.trim().to_owned())
            .collect();

        let eq_at = skip_whitespace(text, names_span.end);
        if !text.get(eq_at..).is_some_and(|t| t.starts_with('=')) {
            return Err(EngineError::structural_mismatch(format!(
                "destructuring binding at offset {let_at} has no '='"
            )));
        }
        let semi_at = text
            .get(eq_at..)
            .and_then(|tail| tail.find(';'))
            .map(|offset| eq_at + offset)
            .ok_or_else(|| {
                EngineError::structural_mismatch(format!(
                    "destructuring binding at offset {let_at} has no terminator"
                ))
            })?;
        let rhs = text
            .get(eq_at + 1..semi_at)
            .unwrap_or_default()
            .trim()
            .to_owned();

        return Ok(Some(BindingStatement {
            stmt_span: let_at..semi_at + 1,
            names,
            rhs,
        }));
    }
    Ok(None)
}

/// Maps each bound name to its tuple position; `_` positions are skipped.
fn bound_fields(
    binding: &BindingStatement,
    entity: &str,
    table: &FieldIndexTable,
) -> Result<Vec<(String, usize)>, EngineError> {
    binding
        .names
        .iter()
        .filter(|name| *name != "_" && !name.is_empty())
        .map(|name| {
            table
                .index_of(entity, name)
                .map(|index| (name.clone(), index))
                .ok_or_else(|| {
                    EngineError::template_mismatch(format!(
                        "bound name '{name}' has no field index in entity '{entity}'"
                    ))
                })
        })
        .collect()
}

/// Rewrites the scope that starts at `scope_start` (the remainder of the
/// enclosing block) through `rewrite`.
fn apply_in_scope(
    text: &mut String,
    scope_start: usize,
    rewrite: impl Fn(&str) -> String,
) -> Result<(), EngineError> {
    let scope_span = scanner::scan(
        text,
        scope_start,
        &ScanOptions {
            body_started: true,
            body_only: true,
            ..ScanOptions::default()
        },
    )?;
    let scope = text.get(scope_span.clone()).unwrap_or_default();
    let rewritten = rewrite(scope);
    text.replace_range(scope_span, &rewritten);
    Ok(())
}

/// Deletes a freshly introduced alias binding and substitutes its single
/// use with the full right-hand expression, when it is used exactly once.
fn inline_single_use_alias(
    text: &mut String,
    stmt_start: usize,
    scope_start: usize,
    entity: &str,
    rhs: &str,
) -> Result<(), EngineError> {
    let scope_span = scanner::scan(
        text,
        scope_start,
        &ScanOptions {
            body_started: true,
            body_only: true,
            ..ScanOptions::default()
        },
    )?;
    let scope = text.get(scope_span.clone()).unwrap_or_default();
    if tokens::count_bare_identifier(scope, entity) != 1 {
        return Ok(());
    }

    let inlined = tokens::replace_identifiers(scope, |ident, after_dot| {
        (!after_dot && ident == entity).then(|| rhs.to_owned())
    });
    text.replace_range(scope_span, &inlined);

    let alias_span = expand_to_line(text, &(stmt_start..scope_start));
    text.replace_range(alias_span, "");
    Ok(())
}

/// Expands a statement span to swallow the whole line when the statement
/// stands alone on it.
fn expand_to_line(text: &str, span: &Range<usize>) -> Range<usize> {
    let before = text.get(..span.start).unwrap_or_default();
    let lead: usize = before
        .chars()
        .rev()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(char::len_utf8)
        .sum();
    let alone_on_line = before
        .get(..span.start - lead)
        .is_some_and(|t| t.is_empty() || t.ends_with('\n'));
    if !alone_on_line {
        return span.clone();
    }

    let after = text.get(span.end..).unwrap_or_default();
    let trail: usize = after
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(char::len_utf8)
        .sum();
    let newline = usize::from(
        after
            .get(trail..)
            .is_some_and(|t| t.starts_with('\n')),
    );
    span.start - lead..span.end + trail + newline
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text.get(from..).map_or(from, |tail| {
        let skipped: usize = tail
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        from + skipped
    })
}

fn unwrap_block(text: &str) -> String {
    text.get(1..text.len() - 1).unwrap_or_default().to_owned()
}
