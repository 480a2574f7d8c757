//! Cosmetic whitespace cleanup applied after reindentation.

/// Squeezes the rewritten source's whitespace.
///
/// Runs of blank lines collapse to one, trailing horizontal whitespace is
/// trimmed from every line, and the text ends with exactly one newline.
/// Idempotent.
#[must_use]
pub fn tidy(source: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in source.split('\n') {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
            lines.push("");
        } else {
            previous_blank = false;
            lines.push(trimmed);
        }
    }

    while lines.last() == Some(&"") {
        lines.pop();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
