//! Unit tests over the crate's public surface.

use rstest::rstest;

use crate::{
    Direction, Flavour, Role, ScanOptions, classify, flip_direction, index_methods, reindent,
    scan, specialise_flavour,
};

// =============================================================================
// Scanner Scenarios
// =============================================================================

#[rstest]
#[case(false, "{ return 1; }")]
#[case(true, " return 1; ")]
fn block_body_scan_honours_body_only(#[case] body_only: bool, #[case] expected: &str) {
    let source = "func get(k) { return 1; }";
    let anchor = source.find("get").unwrap_or_default();
    let options = ScanOptions {
        body_only,
        ..ScanOptions::default()
    };
    let span = scan(source, anchor, &options).expect("scan");
    assert_eq!(source.get(span), Some(expected));
}

#[test]
fn terminated_body_scan_includes_the_terminator() {
    let source = "func helper() x + 1;";
    let span = scan(source, 0, &ScanOptions::default()).expect("scan");
    assert_eq!(span.end, source.len());
    assert_eq!(source.get(span), Some(source));
}

// =============================================================================
// Classification
// =============================================================================

#[rstest]
#[case("putMoveFront", Role::Insert, Direction::Backward, true)]
#[case("popFront", Role::Remove, Direction::Backward, false)]
#[case("valsDesc", Role::Iterate, Direction::Backward, false)]
#[case("clone", Role::Bulk, Direction::Forward, false)]
fn public_classification_matches_the_grammar(
    #[case] name: &str,
    #[case] role: Role,
    #[case] direction: Direction,
    #[case] moves_existing: bool,
) {
    let d = classify(name, Flavour::Map).expect("descriptor");
    assert_eq!(d.role, role);
    assert_eq!(d.direction, direction);
    assert_eq!(d.moves_existing, moves_existing);
}

#[rstest]
#[case("rehash")]
#[case("size")]
#[case("hash")]
fn unknown_names_have_no_descriptor(#[case] name: &str) {
    assert_eq!(classify(name, Flavour::Map), None);
}

// =============================================================================
// Pipeline Properties
// =============================================================================

const CORPUS: &str = "\
func putHelper(map, hashUtils, keyParam, valueParam) {
  let (_, _, edgeEntry) = map.body;
  let prevEntry = edgeEntry.0[DEQ_PREV];
  if (moveExisting) {
    detachEntry(keyParam, (edgeEntry, edgeEntry));
  } else {
    attachEntry(keyParam, valueParam, (edgeEntry, edgeEntry));
  }
  if (returnValue) {
    return previousValue(keyParam);
  } else {
    return;
  }
}

func put(map, hashUtils, keyParam, valueParam) putHelper(map, hashUtils, keyParam, valueParam);

func putFront(map, hashUtils, keyParam, valueParam) putHelper(map, hashUtils, keyParam, valueParam);

func putMove(map, hashUtils, keyParam, valueParam) putHelper(map, hashUtils, keyParam, valueParam);
";

const PLACEHOLDER_TOKENS: &[&str] = &[
    "Helper",
    "moveExisting",
    "returnValue",
    "byKey",
    "mapFlavour",
    "setFlavour",
    "yieldHit",
    "yieldMiss",
    "projectEntry",
    "edgeEntry",
];

#[test]
fn specialised_output_carries_no_placeholder_tokens() {
    let result = specialise_flavour(CORPUS, Flavour::Map).expect("specialise");
    for token in PLACEHOLDER_TOKENS {
        assert!(
            !result.output().contains(token),
            "token '{token}' survived: {}",
            result.output()
        );
    }
}

#[test]
fn engine_output_is_a_reindentation_fixed_point() {
    let result = specialise_flavour(CORPUS, Flavour::Map).expect("specialise");
    assert_eq!(reindent(result.output()), result.output());
}

#[test]
fn engine_output_indexes_cleanly_again() {
    let result = specialise_flavour(CORPUS, Flavour::Map).expect("specialise");
    let records = index_methods(result.output()).expect("re-index");
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["put", "putFront", "putMove"]);
}

#[rstest]
#[case(CORPUS)]
#[case("links[DEQ_NEXT] and edge.0[DEQ_PREV]")]
#[case("")]
fn flip_is_an_involution_on_any_text(#[case] text: &str) {
    assert_eq!(flip_direction(&flip_direction(text)), text);
}

#[test]
fn forward_and_front_outputs_differ_only_in_anchor_order() {
    let result = specialise_flavour(CORPUS, Flavour::Map).expect("specialise");
    let out = result.output();
    assert!(out.contains("attachEntry(keyParam, valueParam, (prevEntry, body.2));"));
    assert!(out.contains("attachEntry(keyParam, valueParam, (body.2, prevEntry));"));
}
