//! Orchestration of one flavour's specialization run.
//!
//! The engine scans a flavour's source once, captures the canonical
//! templates (deleting `...Helper` declarations from the output), derives
//! every variant body, and splices the results back into the buffer by
//! whole-span replacement before reindenting. There is no partial output:
//! the first failure aborts the flavour with the offending method named.

use std::ops::Range;

use tracing::{debug, info};

use crate::binding;
use crate::descriptor::{
    EXCLUDED_NAMES, HELPER_SUFFIX, VariantDescriptor, classify, foundational_role, helper_role,
};
use crate::error::EngineError;
use crate::fields::FieldIndexTable;
use crate::flavour::Flavour;
use crate::method_index::{MethodRecord, index_methods};
use crate::reindent::reindent;
use crate::specialiser::Specialiser;
use crate::template::{Template, TemplateSet};

/// Tallies of one flavour run, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// Methods discovered in the source.
    pub methods: usize,
    /// Templates captured (helpers and foundational bodies).
    pub templates: usize,
    /// Variants specialized from templates.
    pub specialised: usize,
    /// Methods passed through (unknown names and exclusions).
    pub passthrough: usize,
}

/// Result of specializing one flavour's source.
#[derive(Debug, Clone)]
pub struct SpecialisedSource {
    output: String,
    counts: RunCounts,
}

impl SpecialisedSource {
    /// Returns the rewritten source text.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns the run tallies.
    #[must_use]
    pub const fn counts(&self) -> RunCounts {
        self.counts
    }

    /// Consumes the result, returning the rewritten source text.
    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }
}

/// Specializes one container flavour's source text.
///
/// The output is byte-for-byte deterministic for a given input.
///
/// # Errors
///
/// Propagates every scanner, rewriter, and specializer failure; no output
/// is produced for a flavour whose method set did not specialize cleanly.
pub fn specialise_flavour(
    source: &str,
    flavour: Flavour,
) -> Result<SpecialisedSource, EngineError> {
    let records = index_methods(source)?;
    let templates = capture_templates(source, &records)?;
    let specialiser = Specialiser::new(&templates, flavour);
    let table = FieldIndexTable::new(flavour);

    let mut counts = RunCounts {
        methods: records.len(),
        templates: templates.len(),
        ..RunCounts::default()
    };
    let mut splices: Vec<(Range<usize>, String)> = Vec::new();

    for record in &records {
        if record.name.ends_with(HELPER_SUFFIX) {
            splices.push((whole_lines(source, &record.full_span), String::new()));
            continue;
        }
        if EXCLUDED_NAMES.contains(&record.name.as_str()) {
            counts.passthrough += 1;
            continue;
        }

        let inner = source.get(record.inner_span.clone()).unwrap_or_default();
        match classify(&record.name, flavour) {
            Some(d) => {
                let body = specialise_one(&specialiser, record, &d, inner)?;
                let block = wrap_block(&body);
                // A terminated body's span starts right after the
                // parameter list, so the block needs its own separator.
                let replacement = if record.has_block_body() {
                    block
                } else {
                    format!(" {block}")
                };
                splices.push((record.body_span.clone(), replacement));
                counts.specialised += 1;
            }
            None => {
                if pass_through(record, inner, &table, &mut splices)? {
                    debug!(method = record.name.as_str(), "projection-rewrote passthrough");
                }
                counts.passthrough += 1;
            }
        }
    }

    let output = reindent(&apply_splices(source, splices)?);
    info!(
        flavour = flavour.as_str(),
        methods = counts.methods,
        specialised = counts.specialised,
        "flavour specialised"
    );
    Ok(SpecialisedSource { output, counts })
}

fn specialise_one(
    specialiser: &Specialiser<'_>,
    record: &MethodRecord,
    descriptor: &VariantDescriptor,
    inner: &str,
) -> Result<String, EngineError> {
    specialiser
        .specialise(&record.name, descriptor, inner)
        .map_err(|err| err.for_method(&record.name))
}

/// Applies the field-projection pass to an unclassified method.
///
/// Returns whether the body changed; terminated bodies carry no bindings
/// and pass through untouched.
fn pass_through(
    record: &MethodRecord,
    inner: &str,
    table: &FieldIndexTable,
    splices: &mut Vec<(Range<usize>, String)>,
) -> Result<bool, EngineError> {
    if !record.has_block_body() {
        return Ok(false);
    }
    let rewritten = binding::rewrite_bindings(inner, table).map_err(|err| {
        err.for_method(&record.name)
    })?;
    if rewritten == inner {
        return Ok(false);
    }
    splices.push((record.inner_span.clone(), rewritten));
    Ok(true)
}

/// Captures every template declared in the source.
///
/// `...Helper` methods always capture; a foundational name captures only
/// when its role has no helper, and is re-emitted through the normal
/// specialization path.
fn capture_templates(
    source: &str,
    records: &[MethodRecord],
) -> Result<TemplateSet, EngineError> {
    let mut templates = TemplateSet::new();
    for record in records {
        let inner = source.get(record.inner_span.clone()).unwrap_or_default();
        if record.name.ends_with(HELPER_SUFFIX) {
            let role = helper_role(&record.name).ok_or_else(|| {
                EngineError::template_mismatch(format!(
                    "helper '{}' names no known role",
                    record.name
                ))
            })?;
            templates.insert(Template::new(role, record.name.clone(), inner))?;
            continue;
        }
        if let Some(role) = foundational_role(&record.name)
            && templates.get(role).is_none()
        {
            templates.insert(Template::new(role, record.name.clone(), inner))?;
        }
    }
    Ok(templates)
}

/// Applies collected splices in descending span order so earlier offsets
/// stay valid.
fn apply_splices(
    source: &str,
    mut splices: Vec<(Range<usize>, String)>,
) -> Result<String, EngineError> {
    splices.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut out = source.to_owned();
    for (range, text) in splices {
        if !out.is_char_boundary(range.start) || !out.is_char_boundary(range.end) {
            return Err(EngineError::internal_error(
                "splice range is not on a UTF-8 boundary",
            ));
        }
        out.replace_range(range, &text);
    }
    Ok(out)
}

/// Wraps a specialized interior back into a block body.
fn wrap_block(inner: &str) -> String {
    format!("{{\n{}\n}}", inner.trim_matches('\n'))
}

/// Extends a deleted declaration's span over surrounding blank space so
/// template removal leaves no hole.
fn whole_lines(source: &str, span: &Range<usize>) -> Range<usize> {
    let before = source.get(..span.start).unwrap_or_default();
    let lead: usize = before
        .chars()
        .rev()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(char::len_utf8)
        .sum();
    let after = source.get(span.end..).unwrap_or_default();
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

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_SOURCE: &str = "\
func putHelper(map, hashUtils, keyParam, valueParam) {
  let (getHash, areEqual) = hashUtils;
  let (_, _, edgeEntry) = map.body;
  let hashValue = getHash(keyParam);
  let prevEntry = edgeEntry.0[DEQ_PREV];
  if (moveExisting) {
    detachEntry(keyParam, (edgeEntry, edgeEntry));
  } else {
    attachEntry(hashValue, valueParam, (edgeEntry, edgeEntry));
  }
  if (returnValue) {
    return previousValue(keyParam);
  } else {
    return;
  }
}

func put(map, hashUtils, keyParam, valueParam) putHelper(map, hashUtils, keyParam, valueParam);

func putFront(map, hashUtils, keyParam, valueParam) putHelper(map, hashUtils, keyParam, valueParam);

func get(map, hashUtils, keyParam) {
  if (byKey) {
    let entry = findByHash(keyParam);
    if (entry == null) {
      return yieldMiss();
    };
    let (links, key, value, hash) = entry;
    if (checkEqual(key, keyParam)) {
      return yieldHit(entry);
    };
    return yieldMiss();
  } else {
    let entry = edgePick(DEQ_NEXT);
    if (entry == null) {
      return yieldMiss();
    };
    let (links, key, value, hash) = entry;
    return yieldHit(entry);
  }
}

func has(map, hashUtils, keyParam) getHelper(map, hashUtils, keyParam);

func peekFront(map, hashUtils, keyParam) getHelper(map, hashUtils, keyParam);

func next(iter) {
  return advance(iter);
}

func sizeOf(map) {
  let (_, capacity, _) = map.body;
  return capacity;
}
";

    const SET_SOURCE: &str = "\
func putHelper(set, hashUtils, keyParam) {
  let (getHash, areEqual) = hashUtils;
  let (_, _, edgeEntry) = set.body;
  let hashValue = getHash(keyParam);
  let prevEntry = edgeEntry.0[DEQ_PREV];
  if (moveExisting) {
    detachEntry(keyParam, (edgeEntry, edgeEntry));
  } else {
    attachEntry(hashValue, (edgeEntry, edgeEntry));
  }
  if (returnValue) {
    return wasPresent(keyParam);
  } else {
    return;
  }
}

func add(set, hashUtils, keyParam) putHelper(set, hashUtils, keyParam);

func getHelper(set, hashUtils, keyParam) {
  if (byKey) {
    let entry = findByHash(keyParam);
    if (entry == null) {
      return yieldMiss();
    };
    let (links, key, hash) = entry;
    if (checkEqual(key, keyParam)) {
      return yieldHit(entry);
    };
    return yieldMiss();
  } else {
    let entry = edgePick(DEQ_NEXT);
    if (entry == null) {
      return yieldMiss();
    };
    let (links, key, hash) = entry;
    return yieldHit(entry);
  }
}

func has(set, hashUtils, keyParam) getHelper(set, hashUtils, keyParam);

func peek(set, hashUtils, keyParam) getHelper(set, hashUtils, keyParam);
";

    #[test]
    fn map_flavour_specialises_every_variant() {
        let result = specialise_flavour(MAP_SOURCE, Flavour::Map).expect("specialise");
        let out = result.output();

        assert!(!out.contains("Helper"), "templates must be deleted: {out}");
        assert!(out.contains("func put(map, hashUtils, keyParam, valueParam) {"));
        assert!(out.contains("attachEntry(hashValue, valueParam, (prevEntry, body.2));"));
        assert!(out.contains("(body.2, prevEntry)"));
        assert!(out.contains("return ?entry.2;"));
        assert!(out.contains("return true;"));
        assert!(out.contains("return false;"));
        assert!(out.contains("edgePick(DEQ_PREV)"));
        assert!(!out.contains("byKey"));
        assert!(!out.contains("yieldHit"));
        assert!(!out.contains("moveExisting"));
    }

    #[test]
    fn map_flavour_counts_the_run() {
        let result = specialise_flavour(MAP_SOURCE, Flavour::Map).expect("specialise");
        let counts = result.counts();
        assert_eq!(counts.methods, 8);
        assert_eq!(counts.templates, 2);
        assert_eq!(counts.specialised, 5);
        assert_eq!(counts.passthrough, 2);
    }

    #[test]
    fn foundational_get_is_re_emitted_specialised() {
        let result = specialise_flavour(MAP_SOURCE, Flavour::Map).expect("specialise");
        let out = result.output();
        assert!(out.contains("func get(map, hashUtils, keyParam) {"));
        assert!(out.contains("checkEqual(entry.1, keyParam)"));
    }

    #[test]
    fn excluded_method_passes_through_untouched() {
        let result = specialise_flavour(MAP_SOURCE, Flavour::Map).expect("specialise");
        assert!(result.output().contains("return advance(iter);"));
    }

    #[test]
    fn unknown_method_gets_projection_rewriting_only() {
        let result = specialise_flavour(MAP_SOURCE, Flavour::Map).expect("specialise");
        let out = result.output();
        assert!(out.contains("func sizeOf(map) {"));
        assert!(out.contains("return map.body.1;"));
        assert!(!out.contains("capacity"));
    }

    #[test]
    fn output_is_deterministic() {
        let first = specialise_flavour(MAP_SOURCE, Flavour::Map).expect("first");
        let second = specialise_flavour(MAP_SOURCE, Flavour::Map).expect("second");
        assert_eq!(first.output(), second.output());
    }

    #[test]
    fn set_flavour_projects_keys_not_values() {
        let result = specialise_flavour(SET_SOURCE, Flavour::Set).expect("specialise");
        let out = result.output();

        assert!(!out.contains("Helper"));
        assert!(out.contains("attachEntry(hashValue, (prevEntry, body.2));"));
        assert!(out.contains("return ?entry.1;"));
        assert!(out.contains("checkEqual(entry.1, keyParam)"));
        assert!(!out.contains("entry.3"));
    }

    #[test]
    fn set_flavour_counts_the_run() {
        let result = specialise_flavour(SET_SOURCE, Flavour::Set).expect("specialise");
        let counts = result.counts();
        assert_eq!(counts.methods, 5);
        assert_eq!(counts.templates, 2);
        assert_eq!(counts.specialised, 3);
        assert_eq!(counts.passthrough, 0);
    }

    #[test]
    fn missing_template_aborts_the_flavour() {
        let source = "func put(map, hashUtils, k, v) putHelper(map, hashUtils, k, v);\n";
        let result = specialise_flavour(source, Flavour::Map);
        assert!(matches!(result, Err(EngineError::TemplateMismatch { .. })));
    }

    #[test]
    fn unbalanced_source_aborts_the_flavour() {
        let source = "func broken(map) { let a = 1;\n";
        let result = specialise_flavour(source, Flavour::Map);
        assert!(matches!(result, Err(EngineError::StructuralMismatch { .. })));
    }
}
