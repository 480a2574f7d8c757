//! Template-driven specialization of an ordered container's source.
//!
//! This crate rewrites the generic, parameter-driven implementation of an
//! ordered hash container (a map or set with deque-style ordering) into a
//! family of specialized, self-contained method bodies. It knows no
//! grammar for the language it transforms; everything rests on:
//!
//! - **Body scanning** via [`scan`] — a delimiter-balanced walk that
//!   locates a method body (block or single terminated statement) without
//!   a parser
//! - **Symbol rewriting** via [`rewrite_bindings`] — tuple destructurings
//!   become direct positional projections per the [`FieldIndexTable`]
//! - **Specialization** via [`Specialiser`] — one canonical helper body
//!   per operation family is turned into every named variant (forward and
//!   backward, move-existing, placement-relative, map- and set-flavoured)
//!   by an ordered list of rewrite rules
//! - **Orchestration** via [`specialise_flavour`] — one call rewrites a
//!   whole flavour's source and reindents the result
//!
//! The two container flavours run through identical machinery with
//! independent buffers and template registries; outputs are byte-for-byte
//! deterministic.
//!
//! # Example: one flavour end to end
//!
//! ```
//! use stencil_core::{Flavour, specialise_flavour};
//!
//! let source = std::fs::read_to_string("Map.source")?;
//! let result = specialise_flavour(&source, Flavour::Map)?;
//! println!("{} methods specialised", result.counts().specialised);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example: scanning a body span
//!
//! ```
//! use stencil_core::{ScanOptions, scan};
//!
//! let source = "func get(k) { return 1; }";
//! let span = scan(source, 0, &ScanOptions::default())?;
//! assert_eq!(&source[span], "{ return 1; }");
//! # Ok::<(), stencil_core::EngineError>(())
//! ```
//!
//! Every failure is fatal for the flavour that produced it: a body that
//! never balances, a rewrite rule whose anchor is missing, or a template
//! that was never captured abort the run with the offending method named.
//! There is no partial output and no retry.

mod binding;
mod descriptor;
mod engine;
mod error;
mod fields;
mod flavour;
mod method_index;
mod reindent;
mod scanner;
mod specialiser;
mod template;
mod tokens;

pub use binding::rewrite_bindings;
pub use descriptor::{Direction, Role, VariantDescriptor, classify};
pub use engine::{RunCounts, SpecialisedSource, specialise_flavour};
pub use error::EngineError;
pub use fields::{FieldIndexTable, ResolvedEntity};
pub use flavour::{Flavour, FlavourParseError};
pub use method_index::{MethodRecord, index_methods};
pub use reindent::reindent;
pub use scanner::{DelimiterPair, ScanOptions, scan, scan_after};
pub use specialiser::{Specialiser, flip_direction};
pub use template::{Template, TemplateSet};

#[cfg(test)]
mod tests;
