//! Field-index tables for positional entity tuples.
//!
//! The container corpus stores its entities as positional tuples with a
//! fixed field order per flavour. A destructuring such as
//! `let (links, key, value, hash) = entry;` is compiled away by projecting
//! each bound name through its position (`entry.0`, `entry.1`, ...). This
//! module holds the fixed name-to-position mapping for every entity kind.

use crate::flavour::Flavour;

const MAP_ENTRY_FIELDS: &[&str] = &["links", "key", "value", "hash"];
const SET_ENTRY_FIELDS: &[&str] = &["links", "key", "hash"];
const BODY_FIELDS: &[&str] = &["buckets", "capacity", "edgeEntry"];
const HASH_UTILS_FIELDS: &[&str] = &["getHash", "areEqual"];
const MAP_ITEM_FIELDS: &[&str] = &["key", "value"];
const SET_ITEM_FIELDS: &[&str] = &["key"];

/// Fixed mapping from logical field names to tuple positions, per flavour.
///
/// Indices are stable for the lifetime of a run and identical across all
/// methods of the same flavour; a wrong index here is exactly the
/// specialization bug class the tables exist to prevent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIndexTable {
    flavour: Flavour,
}

impl FieldIndexTable {
    /// Creates the table for one container flavour.
    #[must_use]
    pub const fn new(flavour: Flavour) -> Self {
        Self { flavour }
    }

    /// Returns the flavour this table serves.
    #[must_use]
    pub const fn flavour(&self) -> Flavour {
        self.flavour
    }

    /// Returns the ordered field names of a known entity kind.
    ///
    /// Returns `None` for entity names the corpus does not define.
    #[must_use]
    pub fn fields_of(&self, entity: &str) -> Option<&'static [&'static str]> {
        match entity {
            "entry" => Some(match self.flavour {
                Flavour::Map => MAP_ENTRY_FIELDS,
                Flavour::Set => SET_ENTRY_FIELDS,
            }),
            "body" => Some(BODY_FIELDS),
            "hashUtils" => Some(HASH_UTILS_FIELDS),
            "item" => Some(match self.flavour {
                Flavour::Map => MAP_ITEM_FIELDS,
                Flavour::Set => SET_ITEM_FIELDS,
            }),
            _ => None,
        }
    }

    /// Returns the tuple position of `field` within `entity`.
    #[must_use]
    pub fn index_of(&self, entity: &str, field: &str) -> Option<usize> {
        self.fields_of(entity)
            .and_then(|fields| fields.iter().position(|name| *name == field))
    }

    /// Resolves the right-hand side of a destructuring binding to the
    /// entity it denotes.
    ///
    /// Two shapes are recognised:
    /// - the bare entity variable itself (`entry`, `hashUtils`), in which
    ///   case no alias statement is needed (`needs_alias = false`);
    /// - a field access whose final segment names an entity (`map.body`,
    ///   `set.body`), in which case an alias binding for the entity name
    ///   must be introduced (`needs_alias = true`).
    #[must_use]
    pub fn entity_for_rhs<'a>(&self, rhs: &'a str) -> Option<ResolvedEntity<'a>> {
        let trimmed = rhs.trim();
        if self.fields_of(trimmed).is_some() {
            return Some(ResolvedEntity {
                entity: trimmed,
                needs_alias: false,
            });
        }
        let (prefix, last) = trimmed.rsplit_once('.')?;
        if !prefix.is_empty() && self.fields_of(last).is_some() {
            return Some(ResolvedEntity {
                entity: last,
                needs_alias: true,
            });
        }
        None
    }
}

/// Entity resolved from a binding's right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEntity<'a> {
    /// The entity kind the binding destructures.
    pub entity: &'a str,
    /// Whether an alias binding for the entity name must be introduced.
    pub needs_alias: bool,
}
