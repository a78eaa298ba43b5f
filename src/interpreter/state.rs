//! Mutable runtime state of one execution session.
//!
//! [`ExecutionState`] holds the operand stack, the flat memory region, the
//! program counter and the halted flag. A fresh state is created for every
//! RUN and every DEBUG session and is only mutated by the stepper.
//!
//! Memory policy: `AMEM n` appends `n` zero-filled positions, `DMEM n`
//! removes the last `n`. Any access outside `0..allocated` faults, and so does
//! growing memory past [`MAX_MEMORY`] positions.

use crate::interpreter::errors::FaultKind;

/// Most memory positions a session may hold at once.
pub const MAX_MEMORY: usize = 1 << 24;

/// Operand stack, memory region and control registers of a session.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecutionState {
    /// Operand stack, bottom first.
    stack: Vec<i64>,
    /// Allocated memory positions.
    memory: Vec<i64>,
    /// Index of the next instruction to execute.
    pub(crate) pc: usize,
    /// Set by PARA or by a fault.
    pub(crate) halted: bool,
}

impl ExecutionState {
    /// Creates an empty state positioned at the first instruction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack contents ordered bottom to top.
    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    /// Allocated memory positions, offset 0 first.
    pub fn memory(&self) -> &[i64] {
        &self.memory
    }

    /// Index of the next instruction to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub(crate) fn push(&mut self, value: i64) {
        self.stack.push(value);
    }

    /// Ensures at least `needed` values are on the stack before popping them.
    pub(crate) fn require(&self, mnemonic: &'static str, needed: usize) -> Result<(), FaultKind> {
        if self.stack.len() < needed {
            return Err(FaultKind::StackUnderflow {
                mnemonic,
                needed,
                available: self.stack.len(),
            });
        }
        Ok(())
    }

    /// Pops the top value.
    pub(crate) fn pop(&mut self, mnemonic: &'static str) -> Result<i64, FaultKind> {
        self.stack.pop().ok_or(FaultKind::StackUnderflow {
            mnemonic,
            needed: 1,
            available: 0,
        })
    }

    /// Pops `(left, right)` where `right` was on top.
    pub(crate) fn pop_pair(&mut self, mnemonic: &'static str) -> Result<(i64, i64), FaultKind> {
        self.require(mnemonic, 2)?;
        let right = self.pop(mnemonic)?;
        let left = self.pop(mnemonic)?;
        Ok((left, right))
    }

    /// Grows memory by `count` zero-filled positions.
    pub(crate) fn allocate(&mut self, count: usize) -> Result<(), FaultKind> {
        let allocated = self.memory.len();
        let too_large = FaultKind::AllocationTooLarge {
            requested: count,
            allocated,
            limit: MAX_MEMORY,
        };
        let total = match allocated.checked_add(count) {
            Some(total) if total <= MAX_MEMORY => total,
            _ => return Err(too_large),
        };
        self.memory
            .try_reserve_exact(count)
            .map_err(|_| too_large)?;
        self.memory.resize(total, 0);
        Ok(())
    }

    /// Shrinks memory by `count` positions.
    pub(crate) fn deallocate(&mut self, count: usize) -> Result<(), FaultKind> {
        let allocated = self.memory.len();
        if count > allocated {
            return Err(FaultKind::DeallocationExceedsAllocated {
                requested: count,
                allocated,
            });
        }
        self.memory.truncate(allocated - count);
        Ok(())
    }

    pub(crate) fn read(&self, offset: usize) -> Result<i64, FaultKind> {
        self.memory
            .get(offset)
            .copied()
            .ok_or(FaultKind::MemoryOutOfBounds {
                offset,
                allocated: self.memory.len(),
            })
    }

    pub(crate) fn write(&mut self, offset: usize, value: i64) -> Result<(), FaultKind> {
        let allocated = self.memory.len();
        let slot = self
            .memory
            .get_mut(offset)
            .ok_or(FaultKind::MemoryOutOfBounds { offset, allocated })?;
        *slot = value;
        Ok(())
    }
}
