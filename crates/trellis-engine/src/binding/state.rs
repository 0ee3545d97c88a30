use std::collections::BTreeMap;
use std::sync::Arc;

use crate::shader::ProgramId;

use super::{AttributeBinding, Geometry};

/// Enabled attribute arrays for the active program, keyed by location.
///
/// Cleared whenever a different program becomes active.
#[derive(Debug, Default)]
pub(crate) struct VertexState {
    program: Option<ProgramId>,
    enabled: BTreeMap<u32, AttributeBinding>,
}

impl VertexState {
    /// Switches to `program`. Returns true if this dropped enabled attributes.
    pub(crate) fn switch_program(&mut self, program: ProgramId) -> bool {
        if self.program == Some(program) {
            return false;
        }
        self.program = Some(program);
        let had_any = !self.enabled.is_empty();
        self.enabled.clear();
        had_any
    }

    /// Enables `binding`. Returns false if the exact same binding was already enabled.
    pub(crate) fn enable(&mut self, binding: AttributeBinding) -> bool {
        match self.enabled.get(&binding.location) {
            Some(existing) if *existing == binding => false,
            _ => {
                self.enabled.insert(binding.location, binding);
                true
            }
        }
    }

    pub(crate) fn get(&self, location: u32) -> Option<&AttributeBinding> {
        self.enabled.get(&location)
    }

    pub(crate) fn len(&self) -> usize {
        self.enabled.len()
    }

    pub(crate) fn snapshot(&self) -> Option<Geometry> {
        let program = self.program?;
        let bindings: Arc<[AttributeBinding]> = self.enabled.values().cloned().collect();
        Some(Geometry { program, bindings })
    }
}
