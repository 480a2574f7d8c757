//! Variant classification from method names.
//!
//! A method name encodes everything the specializer needs: a role verb
//! (`put`, `remove`, `keys`, ...), an optional `Move` token for
//! move-existing semantics, and an optional trailing direction or
//! placement token (`Front`, `Desc`, `Before`, `After`). The mapping is
//! an explicit ordered table rather than scattered string tests so it can
//! be audited and tested exhaustively. Names matching no entry are passed
//! through by the orchestrator untouched.

use crate::flavour::Flavour;

/// Operation families the engine can specialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Insertion at an ordering edge or relative to an anchor entry.
    Insert,
    /// Removal by key or at an ordering edge.
    Remove,
    /// Point lookup by key or at an ordering edge.
    Query,
    /// Ordered traversal.
    Iterate,
    /// Bulk construction from another container or an iterator.
    Bulk,
}

impl Role {
    /// Returns the lower-case identifier for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::Query => "query",
            Self::Iterate => "iterate",
            Self::Bulk => "bulk",
        }
    }
}

/// Traversal direction of a variant relative to the deque ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Toward the back of the ordering (the default).
    #[default]
    Forward,
    /// Toward the front of the ordering (`Front`, `Desc`, `Before`).
    Backward,
}

/// Semantic parameters decoded from a method name.
///
/// Derived deterministically per method and never stored; the same name
/// always yields the same descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDescriptor {
    /// The operation family.
    pub role: Role,
    /// The role verb the name starts with.
    pub verb: &'static str,
    /// Traversal/placement direction.
    pub direction: Direction,
    /// Whether an existing entry is moved rather than a new one linked.
    pub moves_existing: bool,
    /// Whether placement is relative to an anchor entry rather than an
    /// ordering edge.
    pub placement_relative: bool,
    /// The container flavour being processed.
    pub flavour: Flavour,
}

/// Method names excluded from all processing (emitted byte-for-byte).
pub const EXCLUDED_NAMES: &[&str] = &["next"];

/// Role verbs in classification order.
const ROLE_VERBS: &[(&str, Role)] = &[
    ("put", Role::Insert),
    ("set", Role::Insert),
    ("add", Role::Insert),
    ("update", Role::Insert),
    ("replace", Role::Insert),
    ("remove", Role::Remove),
    ("delete", Role::Remove),
    ("pop", Role::Remove),
    ("cycle", Role::Remove),
    ("get", Role::Query),
    ("has", Role::Query),
    ("contains", Role::Query),
    ("peek", Role::Query),
    ("keys", Role::Iterate),
    ("vals", Role::Iterate),
    ("entries", Role::Iterate),
    ("toArray", Role::Iterate),
    ("find", Role::Iterate),
    ("some", Role::Iterate),
    ("every", Role::Iterate),
    ("forEach", Role::Iterate),
    ("map", Role::Iterate),
    ("filter", Role::Iterate),
    ("clone", Role::Bulk),
    ("fromIter", Role::Bulk),
];

/// Canonical helper stems that name a role directly.
const CANONICAL_STEMS: &[(&str, Role)] = &[
    ("put", Role::Insert),
    ("remove", Role::Remove),
    ("get", Role::Query),
    ("iterate", Role::Iterate),
    ("build", Role::Bulk),
];

/// Foundational names whose first occurrence doubles as the role template.
pub const FOUNDATIONAL_NAMES: &[(&str, Role)] = &[("get", Role::Query)];

/// Suffix of canonical template method names.
pub const HELPER_SUFFIX: &str = "Helper";

/// Decomposes a method name into its variant descriptor.
///
/// Returns `None` when the name matches no role verb or carries an
/// unrecognised trailing token; such methods are passed through.
#[must_use]
pub fn classify(name: &str, flavour: Flavour) -> Option<VariantDescriptor> {
    let (verb, role, rest) = ROLE_VERBS.iter().find_map(|(verb, role)| {
        name.strip_prefix(verb)
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_uppercase))
            .map(|rest| (*verb, *role, rest))
    })?;

    let (moves_existing, rest) = match rest.strip_prefix("Move") {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };

    let (direction, placement_relative) = match rest {
        "" => (Direction::Forward, false),
        "Front" | "Desc" => (Direction::Backward, false),
        "Before" => (Direction::Backward, true),
        "After" => (Direction::Forward, true),
        _ => return None,
    };

    Some(VariantDescriptor {
        role,
        verb,
        direction,
        moves_existing,
        placement_relative,
        flavour,
    })
}

/// Classifies a `...Helper` method name into the role it templates.
///
/// Returns `None` when the stem is neither a canonical stem nor a role
/// verb.
#[must_use]
pub fn helper_role(name: &str) -> Option<Role> {
    let stem = name.strip_suffix(HELPER_SUFFIX)?;
    CANONICAL_STEMS
        .iter()
        .chain(ROLE_VERBS)
        .find(|(candidate, _)| *candidate == stem)
        .map(|(_, role)| *role)
}

/// Returns the role templated by a foundational name, if any.
#[must_use]
pub fn foundational_role(name: &str) -> Option<Role> {
    FOUNDATIONAL_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, role)| *role)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn descriptor(name: &str) -> Option<VariantDescriptor> {
        classify(name, Flavour::Map)
    }

    #[rstest]
    #[case("put", Role::Insert, Direction::Forward, false, false)]
    #[case("putFront", Role::Insert, Direction::Backward, false, false)]
    #[case("putMove", Role::Insert, Direction::Forward, true, false)]
    #[case("putMoveFront", Role::Insert, Direction::Backward, true, false)]
    #[case("putBefore", Role::Insert, Direction::Backward, false, true)]
    #[case("putAfter", Role::Insert, Direction::Forward, false, true)]
    #[case("setFront", Role::Insert, Direction::Backward, false, false)]
    #[case("pop", Role::Remove, Direction::Forward, false, false)]
    #[case("popFront", Role::Remove, Direction::Backward, false, false)]
    #[case("cycle", Role::Remove, Direction::Forward, false, false)]
    #[case("peekFront", Role::Query, Direction::Backward, false, false)]
    #[case("keys", Role::Iterate, Direction::Forward, false, false)]
    #[case("keysDesc", Role::Iterate, Direction::Backward, false, false)]
    #[case("entriesDesc", Role::Iterate, Direction::Backward, false, false)]
    #[case("fromIter", Role::Bulk, Direction::Forward, false, false)]
    fn classify_decodes_known_names(
        #[case] name: &str,
        #[case] role: Role,
        #[case] direction: Direction,
        #[case] moves_existing: bool,
        #[case] placement_relative: bool,
    ) {
        let d = descriptor(name).expect("descriptor");
        assert_eq!(d.role, role);
        assert_eq!(d.direction, direction);
        assert_eq!(d.moves_existing, moves_existing);
        assert_eq!(d.placement_relative, placement_relative);
    }

    #[rstest]
    #[case("settle")]
    #[case("hash")]
    #[case("putSideways")]
    #[case("rehash")]
    #[case("size")]
    fn classify_rejects_unknown_names(#[case] name: &str) {
        assert_eq!(descriptor(name), None);
    }

    #[test]
    fn classify_records_the_verb() {
        let d = descriptor("putMoveFront").expect("descriptor");
        assert_eq!(d.verb, "put");
        let d = descriptor("entries").expect("descriptor");
        assert_eq!(d.verb, "entries");
    }

    #[test]
    fn classify_carries_the_flavour() {
        let d = classify("has", Flavour::Set).expect("descriptor");
        assert_eq!(d.flavour, Flavour::Set);
    }

    #[rstest]
    #[case("putHelper", Some(Role::Insert))]
    #[case("removeHelper", Some(Role::Remove))]
    #[case("getHelper", Some(Role::Query))]
    #[case("iterateHelper", Some(Role::Iterate))]
    #[case("buildHelper", Some(Role::Bulk))]
    #[case("popHelper", Some(Role::Remove))]
    #[case("mysteryHelper", None)]
    #[case("put", None)]
    fn helper_role_classifies_stems(#[case] name: &str, #[case] expected: Option<Role>) {
        assert_eq!(helper_role(name), expected);
    }

    #[test]
    fn get_is_foundational_for_query() {
        assert_eq!(foundational_role("get"), Some(Role::Query));
        assert_eq!(foundational_role("put"), None);
    }

    #[test]
    fn next_is_excluded() {
        assert!(EXCLUDED_NAMES.contains(&"next"));
    }
}
