//! JSON run report for batch invocations.

use serde::Serialize;
use stencil_core::{Flavour, RunCounts};

/// Machine-readable summary of one flavour's specialization run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    flavour: String,
    methods: usize,
    templates: usize,
    specialised: usize,
    passthrough: usize,
}

impl RunReport {
    /// Builds the report from a run's tallies.
    #[must_use]
    pub fn new(flavour: Flavour, counts: RunCounts) -> Self {
        Self {
            flavour: flavour.as_str().to_owned(),
            methods: counts.methods,
            templates: counts.templates,
            specialised: counts.specialised,
            passthrough: counts.passthrough,
        }
    }

    /// Returns the flavour the report describes.
    #[must_use]
    pub fn flavour(&self) -> &str {
        &self.flavour
    }

    /// Returns how many variants were specialized.
    #[must_use]
    pub const fn specialised(&self) -> usize {
        self.specialised
    }
}
