//! Canonical template capture and lookup.
//!
//! Each operation family has one generic body — the `...Helper` method
//! (or the first-seen foundational method) in the corpus — from which all
//! of its variants derive. Templates are captured once per flavour run
//! into a registry owned by the orchestrator, not into ambient global
//! state, so the two flavours stay fully independent.

use std::collections::HashMap;

use crate::descriptor::Role;
use crate::error::EngineError;

/// The canonical generic body for one operation role.
#[derive(Debug, Clone)]
pub struct Template {
    role: Role,
    name: String,
    body: String,
}

impl Template {
    /// Creates a template from a captured method.
    #[must_use]
    pub fn new(role: Role, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            body: body.into(),
        }
    }

    /// Returns the role this template serves.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the name of the method the template was captured from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template's body text (interior, delimiters excluded).
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Registry of captured templates for one flavour run.
#[derive(Debug, Default)]
pub struct TemplateSet {
    templates: HashMap<Role, Template>,
}

impl TemplateSet {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a captured template.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TemplateMismatch`] when a template for the
    /// same role was already captured; the corpus declares exactly one
    /// canonical body per role.
    pub fn insert(&mut self, template: Template) -> Result<(), EngineError> {
        if let Some(existing) = self.templates.get(&template.role()) {
            return Err(EngineError::template_mismatch(format!(
                "duplicate template for role '{}': '{}' after '{}'",
                template.role().as_str(),
                template.name(),
                existing.name(),
            )));
        }
        self.templates.insert(template.role(), template);
        Ok(())
    }

    /// Looks up the template for a role.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<&Template> {
        self.templates.get(&role)
    }

    /// Looks up the template a method requires.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TemplateMismatch`] naming the method when no
    /// template for the role was captured.
    pub fn require(&self, role: Role, method: &str) -> Result<&Template, EngineError> {
        self.get(role).ok_or_else(|| {
            EngineError::template_mismatch(format!(
                "no '{}' template captured for method '{method}'",
                role.as_str(),
            ))
        })
    }

    /// Returns the number of captured templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns whether no template has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
