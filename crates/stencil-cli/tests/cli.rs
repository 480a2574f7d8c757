//! End-to-end tests for the `stencil` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MAP_CORPUS: &str = "\
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

func next(iter) {
  return advance(iter);
}
";

fn stencil() -> Command {
    Command::cargo_bin("stencil").unwrap_or_else(|err| panic!("binary: {err}"))
}

#[test]
fn specialises_a_map_source_to_a_file() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let input = dir.path().join("Map.source");
    let output = dir.path().join("optimized.source");
    std::fs::write(&input, MAP_CORPUS).unwrap_or_else(|err| panic!("write: {err}"));

    stencil()
        .arg(&input)
        .arg("--flavour")
        .arg("map")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let out = std::fs::read_to_string(&output).unwrap_or_else(|err| panic!("read: {err}"));
    assert!(out.contains("(prevEntry, body.2)"));
    assert!(out.contains("(body.2, prevEntry)"));
    assert!(!out.contains("Helper"));
    assert!(out.ends_with('\n'));
    assert!(!out.contains("\n\n\n"));
}

#[test]
fn prints_the_specialized_source_on_stdout_by_default() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let input = dir.path().join("Map.source");
    std::fs::write(&input, MAP_CORPUS).unwrap_or_else(|err| panic!("write: {err}"));

    stencil()
        .arg(&input)
        .arg("--flavour")
        .arg("map")
        .assert()
        .success()
        .stdout(predicate::str::contains("func put(map, hashUtils, keyParam, valueParam) {"))
        .stdout(predicate::str::contains("return advance(iter);"));
}

#[test]
fn report_flag_appends_a_json_summary() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let input = dir.path().join("Map.source");
    let output = dir.path().join("optimized.source");
    std::fs::write(&input, MAP_CORPUS).unwrap_or_else(|err| panic!("write: {err}"));

    stencil()
        .arg(&input)
        .arg("--flavour")
        .arg("map")
        .arg("--output")
        .arg(&output)
        .arg("--report")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"flavour\":\"map\""))
        .stdout(predicate::str::contains("\"specialised\":2"));
}

#[test]
fn missing_input_file_fails_with_the_path() {
    stencil()
        .arg("does-not-exist.source")
        .arg("--flavour")
        .arg("map")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn missing_template_fails_with_the_method_name() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let input = dir.path().join("Map.source");
    std::fs::write(&input, "func put(map, k, v) putHelper(map, k, v);\n")
        .unwrap_or_else(|err| panic!("write: {err}"));

    stencil()
        .arg(&input)
        .arg("--flavour")
        .arg("map")
        .assert()
        .failure()
        .stderr(predicate::str::contains("put"));
}

#[test]
fn unknown_flavour_is_a_usage_error() {
    stencil()
        .arg("whatever.source")
        .arg("--flavour")
        .arg("deque")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deque"));
}
