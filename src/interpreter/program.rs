//! Resolved program representation.
//!
//! A [`Program`] is the dense, label-resolved instruction sequence produced by
//! the [`loader`](super::loader). Execution only ever addresses instructions by
//! index; source line numbers are kept alongside for listings and diagnostics.

use crate::interpreter::isa::Instruction;
use std::collections::BTreeMap;

/// Fully decoded, label-resolved instruction sequence ready for execution.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    /// Instructions in execution order, indexed `0..len`.
    pub(crate) instructions: Vec<Instruction>,
    /// Source line number of each instruction, parallel to `instructions`.
    pub(crate) lines: Vec<u32>,
    /// Label name (upper case) to instruction index.
    pub(crate) labels: BTreeMap<String, usize>,
}

impl Program {
    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at index `pc`, if any.
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    /// Source line the instruction at `pc` was decoded from.
    pub fn line_of(&self, pc: usize) -> Option<u32> {
        self.lines.get(pc).copied()
    }

    /// Index bound to `label`, ignoring ASCII case.
    pub fn label(&self, label: &str) -> Option<usize> {
        self.labels.get(&label.to_ascii_uppercase()).copied()
    }
}
