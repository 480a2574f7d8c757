//! Pattern specialization of canonical template bodies.
//!
//! One generic helper body per operation family is turned into every
//! concrete variant by an ordered list of rewrite rules: helper inlining
//! first (later rules operate on names that only exist after it), then
//! the role's flag collapses, anchoring, and directional/flavour
//! adjustments, and finally the field-projection pass. Rules never
//! degrade to a no-op: a rule whose anchor is absent fails, and any
//! generic token that survives the full pipeline trips the residual
//! placeholder check.

use std::ops::Range;

use tracing::debug;

use crate::binding;
use crate::descriptor::{Direction, Role, VariantDescriptor, helper_role};
use crate::error::EngineError;
use crate::fields::FieldIndexTable;
use crate::flavour::Flavour;
use crate::scanner::{self, ScanOptions};
use crate::template::TemplateSet;
use crate::tokens;

/// Paired names encoding "toward the front" / "toward the back" of the
/// deque ordering.
const FLIP_PAIRS: &[(&str, &str)] = &[("DEQ_PREV", "DEQ_NEXT")];

/// The generic neighbour pair carried by the insert template.
const GENERIC_ANCHOR_PAIR: &str = "(edgeEntry, edgeEntry)";
/// Neighbour pair of a forward (toward-the-back) insertion.
const FORWARD_ANCHOR_PAIR: &str = "(prevEntry, edgeEntry)";
/// Neighbour pair of a backward (toward-the-front) insertion.
const BACKWARD_ANCHOR_PAIR: &str = "(edgeEntry, prevEntry)";

/// Name of the edge sentinel in templates.
const EDGE_ANCHOR: &str = "edgeEntry";
/// Name of the relative anchor in placement-relative variants.
const RELATIVE_ANCHOR: &str = "anchorEntry";

/// The bulk template's generic pair parameter.
const PAIR_PARAMETER: &str = "((keyParam, valueParam) in";
/// The loop variable replacing the pair parameter.
const PAIR_ITEM: &str = "item";

/// Template-only identifiers that must not survive specialization.
const PLACEHOLDER_IDENTS: &[&str] = &[
    "moveExisting",
    "returnValue",
    "byKey",
    "relink",
    "mapFlavour",
    "setFlavour",
    "yieldHit",
    "yieldMiss",
    "projectEntry",
    "links",
    "key",
    "value",
    "hash",
    "buckets",
    "capacity",
    "edgeEntry",
    "getHash",
    "areEqual",
];

/// Upper bound on helper-inlining rounds; templates never nest deeper.
const MAX_INLINE_ROUNDS: usize = 8;

/// Derives concrete variant bodies from captured templates.
#[derive(Debug)]
pub struct Specialiser<'a> {
    templates: &'a TemplateSet,
    table: FieldIndexTable,
}

impl<'a> Specialiser<'a> {
    /// Creates a specializer over one flavour's captured templates.
    #[must_use]
    pub const fn new(templates: &'a TemplateSet, flavour: Flavour) -> Self {
        Self {
            templates,
            table: FieldIndexTable::new(flavour),
        }
    }

    /// Produces the concrete body for one variant.
    ///
    /// `body` is the method's original body interior — a thin helper call
    /// for derived variants, a full block for self-bodied ones.
    ///
    /// # Errors
    ///
    /// Fails fatally on a missing template, a missing rule anchor, an
    /// unknown bound field, or a residual placeholder in the output.
    pub fn specialise(
        &self,
        name: &str,
        descriptor: &VariantDescriptor,
        body: &str,
    ) -> Result<String, EngineError> {
        debug!(method = name, role = descriptor.role.as_str(), "specialising");
        let mut text = self.inline_helpers(body.to_owned(), name)?;

        match descriptor.role {
            Role::Insert => {
                text = collapse_flag(&text, "moveExisting", descriptor.moves_existing, name)?;
                text = collapse_flag(&text, "returnValue", returns_value(descriptor.verb), name)?;
                text = place_anchor_pair(&text, descriptor.direction, name)?;
                if descriptor.placement_relative {
                    text = placement_adjust(&text, name)?;
                }
            }
            Role::Remove => {
                text = collapse_flag(&text, "byKey", is_keyed_remove(descriptor.verb), name)?;
                text = collapse_flag(&text, "returnValue", returns_value(descriptor.verb), name)?;
                text = collapse_flag(&text, "relink", descriptor.verb == "cycle", name)?;
            }
            Role::Query => {
                text = collapse_flag(&text, "byKey", is_keyed_query(descriptor.verb), name)?;
                text = select_query_yield(&text, descriptor, name)?;
            }
            Role::Iterate => {
                if is_projection_verb(descriptor.verb) {
                    text = select_projection(&text, descriptor, name)?;
                }
            }
            Role::Bulk => {
                text = collapse_flag(&text, "moveExisting", false, name)?;
                text = collapse_flag(&text, "returnValue", false, name)?;
                text = place_anchor_pair(&text, Direction::Forward, name)?;
                if descriptor.flavour == Flavour::Map {
                    text = rewrite_pair_parameter(&text, name)?;
                }
            }
        }

        if descriptor.direction == Direction::Backward {
            text = flip_direction(&text);
        }
        text = prune_flavour(&text, descriptor.flavour)?;
        text = binding::rewrite_bindings(&text, &self.table)?;
        assert_no_placeholders(&text, name)?;
        Ok(text)
    }

    /// Replaces every `...Helper(...)` call statement with the called
    /// template's body, repeating until none remains.
    fn inline_helpers(&self, body: String, method: &str) -> Result<String, EngineError> {
        let mut text = body;
        for _ in 0..MAX_INLINE_ROUNDS {
            let Some(call) = find_helper_call(&text)? else {
                return Ok(text);
            };
            let role = helper_role(&call.name).ok_or_else(|| {
                EngineError::template_mismatch(format!(
                    "method '{method}' calls unclassifiable helper '{}'",
                    call.name,
                ))
            })?;
            let template = self.templates.require(role, method)?;
            text.replace_range(call.span, template.body());
        }
        Err(EngineError::internal_error(format!(
            "helper inlining did not converge for method '{method}'"
        )))
    }
}

/// A located helper-call statement.
struct HelperCall {
    name: String,
    span: Range<usize>,
}

/// Finds the first `...Helper( ... );` statement in `text`.
fn find_helper_call(text: &str) -> Result<Option<HelperCall>, EngineError> {
    let mut search = 0usize;
    while let Some(found) = text.get(search..).and_then(|tail| tail.find("Helper")) {
        let suffix_at = search + found;
        let suffix_end = suffix_at + "Helper".len();
        let name_start = ident_start_before(text, suffix_end);
        let boundary_ok = text
            .get(suffix_end..)
            .and_then(|tail| tail.chars().next())
            .is_some_and(|c| !c.is_ascii_alphanumeric() && c != '_');
        if name_start == suffix_end || !boundary_ok {
            search = suffix_end;
            continue;
        }
        let args_at = skip_whitespace(text, suffix_end);
        if !text.get(args_at..).is_some_and(|t| t.starts_with('(')) {
            search = suffix_end;
            continue;
        }

        let args = scanner::scan(
            text,
            args_at,
            &ScanOptions {
                delimiters: scanner::DelimiterPair::PARENS,
                ..ScanOptions::default()
            },
        )?;
        let semi_at = skip_whitespace(text, args.end);
        if !text.get(semi_at..).is_some_and(|t| t.starts_with(';')) {
            return Err(EngineError::structural_mismatch(format!(
                "helper call at offset {name_start} is not a terminated statement"
            )));
        }

        let name = text.get(name_start..suffix_end).unwrap_or_default();
        return Ok(Some(HelperCall {
            name: name.to_owned(),
            span: name_start..semi_at + 1,
        }));
    }
    Ok(None)
}

/// Collapses every `if (FLAG) { A } else { B }` guard to one branch.
///
/// The first occurrence is required; later occurrences are collapsed the
/// same way.
fn collapse_flag(
    text: &str,
    flag: &str,
    keep_then: bool,
    method: &str,
) -> Result<String, EngineError> {
    let anchor = format!("if ({flag})");
    let mut out = text.to_owned();
    let mut collapsed = false;

    while let Some(at) = out.find(&anchor) {
        let then_span = scanner::scan(&out, at + anchor.len(), &ScanOptions::default())?;
        let else_at = skip_whitespace(&out, then_span.end);
        let has_else = out.get(else_at..).is_some_and(|t| t.starts_with("else"));

        let (region, kept_span) = if has_else {
            let else_span = scanner::scan(&out, else_at + "else".len(), &ScanOptions::default())?;
            let kept = if keep_then { then_span } else { else_span.clone() };
            (at..else_span.end, Some(kept))
        } else {
            let kept = keep_then.then(|| then_span.clone());
            (at..then_span.end, kept)
        };

        let replacement = kept_span
            .map(|span| interior_text(&out, &span).trim().to_owned())
            .unwrap_or_default();
        out.replace_range(region, &replacement);
        collapsed = true;
    }

    if collapsed {
        Ok(out)
    } else {
        Err(EngineError::pattern_not_found(anchor, method))
    }
}

/// Rewrites the generic neighbour pair into the variant's anchor order.
///
/// Forward variants link the new entry as `(prevEntry, edgeEntry)`,
/// backward variants as `(edgeEntry, prevEntry)`; the two differ only in
/// anchor order.
fn place_anchor_pair(
    text: &str,
    direction: Direction,
    method: &str,
) -> Result<String, EngineError> {
    if !text.contains(GENERIC_ANCHOR_PAIR) {
        return Err(EngineError::pattern_not_found(GENERIC_ANCHOR_PAIR, method));
    }
    let replacement = match direction {
        Direction::Forward => FORWARD_ANCHOR_PAIR,
        Direction::Backward => BACKWARD_ANCHOR_PAIR,
    };
    Ok(text.replace(GENERIC_ANCHOR_PAIR, replacement))
}

/// Swaps the edge anchor for the relative anchor within the anchoring
/// statement's span only.
fn placement_adjust(text: &str, method: &str) -> Result<String, EngineError> {
    let pair_at = text
        .find(FORWARD_ANCHOR_PAIR)
        .or_else(|| text.find(BACKWARD_ANCHOR_PAIR))
        .ok_or_else(|| EngineError::pattern_not_found("anchored neighbour pair", method))?;

    let stmt_start = text
        .get(..pair_at)
        .and_then(|prefix| prefix.rfind('\n'))
        .map_or(0, |nl| nl + 1);
    let stmt_end = text
        .get(pair_at..)
        .and_then(|tail| tail.find(';'))
        .map(|offset| pair_at + offset + 1)
        .ok_or_else(|| {
            EngineError::structural_mismatch(format!(
                "anchoring statement in '{method}' has no terminator"
            ))
        })?;

    let stmt = text.get(stmt_start..stmt_end).unwrap_or_default();
    let adjusted = tokens::replace_identifiers(stmt, |ident, after_dot| {
        (!after_dot && ident == EDGE_ANCHOR).then(|| RELATIVE_ANCHOR.to_owned())
    });

    let mut out = text.to_owned();
    out.replace_range(stmt_start..stmt_end, &adjusted);
    Ok(out)
}

/// Swaps the paired directional link names throughout `text`.
///
/// The swap is a single simultaneous pass, so applying it twice returns
/// the original text.
#[must_use]
pub fn flip_direction(text: &str) -> String {
    tokens::replace_identifiers(text, |ident, _| {
        FLIP_PAIRS.iter().find_map(|(front, back)| {
            if ident == *front {
                Some((*back).to_owned())
            } else if ident == *back {
                Some((*front).to_owned())
            } else {
                None
            }
        })
    })
}

/// Unwraps or excises flavour-guarded blocks.
///
/// `if (mapFlavour) { ... }` keeps its interior for the map flavour and
/// disappears for the set flavour; `if (setFlavour)` is symmetric. Bodies
/// without guards pass through; a missed guard is caught by the residual
/// placeholder check.
fn prune_flavour(text: &str, flavour: Flavour) -> Result<String, EngineError> {
    let mut out = text.to_owned();
    for (guard, keep) in [
        ("if (mapFlavour)", flavour == Flavour::Map),
        ("if (setFlavour)", flavour == Flavour::Set),
    ] {
        while let Some(at) = out.find(guard) {
            let block = scanner::scan(&out, at + guard.len(), &ScanOptions::default())?;
            let replacement = if keep {
                interior_text(&out, &block).trim().to_owned()
            } else {
                String::new()
            };
            out.replace_range(at..block.end, &replacement);
        }
    }
    Ok(out)
}

/// Substitutes the query template's yield placeholders for the variant's
/// concrete hit and miss expressions.
fn select_query_yield(
    text: &str,
    descriptor: &VariantDescriptor,
    method: &str,
) -> Result<String, EngineError> {
    let hit_field = match descriptor.flavour {
        Flavour::Map => "value",
        Flavour::Set => "key",
    };
    let (hit, miss) = match descriptor.verb {
        "get" | "peek" => (format!("?{hit_field}"), "null"),
        _ => ("true".to_owned(), "false"),
    };

    let mut out = replace_required(text, "yieldHit(entry)", &hit, method)?;
    out = replace_required(&out, "yieldMiss()", miss, method)?;
    Ok(out)
}

/// Substitutes the iterate template's projection placeholder.
fn select_projection(
    text: &str,
    descriptor: &VariantDescriptor,
    method: &str,
) -> Result<String, EngineError> {
    let projection = match (descriptor.verb, descriptor.flavour) {
        ("keys", _) | ("entries" | "toArray", Flavour::Set) => "key",
        ("vals", Flavour::Map) => "value",
        ("vals", Flavour::Set) => {
            return Err(EngineError::template_mismatch(format!(
                "method '{method}' projects a value but the set flavour has none"
            )));
        }
        ("entries" | "toArray", Flavour::Map) => "(key, value)",
        _ => {
            return Err(EngineError::internal_error(format!(
                "projection requested for non-projection verb '{}'",
                descriptor.verb
            )));
        }
    };
    replace_required(text, "projectEntry(entry)", projection, method)
}

/// Rewrites the bulk template's pair parameter into a positional item.
fn rewrite_pair_parameter(text: &str, method: &str) -> Result<String, EngineError> {
    let at = text
        .find(PAIR_PARAMETER)
        .ok_or_else(|| EngineError::pattern_not_found(PAIR_PARAMETER, method))?;

    let block = scanner::scan(text, at + PAIR_PARAMETER.len(), &ScanOptions::default())?;
    let loop_body = text.get(block.clone()).unwrap_or_default();
    let projected = tokens::replace_identifiers(loop_body, |ident, after_dot| {
        if after_dot {
            return None;
        }
        match ident {
            "keyParam" => Some(format!("{PAIR_ITEM}.0")),
            "valueParam" => Some(format!("{PAIR_ITEM}.1")),
            _ => None,
        }
    });

    let mut out = text.to_owned();
    out.replace_range(block, &projected);
    out.replace_range(at..at + PAIR_PARAMETER.len(), &format!("({PAIR_ITEM} in"));
    Ok(out)
}

/// Verifies the postcondition that no generic placeholder token survived.
fn assert_no_placeholders(text: &str, method: &str) -> Result<(), EngineError> {
    let mut residual: Option<String> = None;
    let _ = tokens::replace_identifiers(text, |ident, after_dot| {
        if residual.is_none()
            && !after_dot
            && (ident.ends_with("Helper") || PLACEHOLDER_IDENTS.contains(&ident))
        {
            residual = Some(ident.to_owned());
        }
        None
    });
    residual.map_or(Ok(()), |ident| {
        Err(EngineError::internal_error(format!(
            "residual placeholder '{ident}' in specialized body of '{method}'"
        )))
    })
}

/// Replaces every occurrence of `pattern`, requiring at least one.
fn replace_required(
    text: &str,
    pattern: &str,
    replacement: &str,
    method: &str,
) -> Result<String, EngineError> {
    if !text.contains(pattern) {
        return Err(EngineError::pattern_not_found(pattern, method));
    }
    Ok(text.replace(pattern, replacement))
}

fn is_keyed_remove(verb: &str) -> bool {
    matches!(verb, "remove" | "delete")
}

fn is_keyed_query(verb: &str) -> bool {
    matches!(verb, "get" | "has" | "contains")
}

fn returns_value(verb: &str) -> bool {
    matches!(verb, "put" | "update" | "replace" | "remove" | "pop" | "cycle")
}

fn is_projection_verb(verb: &str) -> bool {
    matches!(verb, "keys" | "vals" | "entries" | "toArray")
}

fn interior_text<'t>(text: &'t str, span: &Range<usize>) -> &'t str {
    text.get(span.start + 1..span.end - 1).unwrap_or_default()
}

fn ident_start_before(text: &str, end: usize) -> usize {
    let prefix = text.get(..end).unwrap_or_default();
    let trailing: usize = prefix
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(char::len_utf8)
        .sum();
    end - trailing
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
