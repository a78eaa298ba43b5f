//! Single-step debugging.
//!
//! A [`DebugSession`] owns a fresh [`ExecutionState`] for one program and
//! advances it one instruction per [`DebugSession::step`] call, exposing the
//! next instruction, the stack and every value printed so far.

use crate::interpreter::errors::FaultKind;
use crate::interpreter::isa::Instruction;
use crate::interpreter::program::Program;
use crate::interpreter::state::ExecutionState;
use crate::interpreter::vm::{self, StepOutcome};

pub struct DebugSession<'p> {
    program: &'p Program,
    state: ExecutionState,
    output: Vec<i64>,
    last: Option<StepOutcome>,
}

impl<'p> DebugSession<'p> {
    /// Starts a session positioned before the first instruction.
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            state: ExecutionState::new(),
            output: Vec::new(),
            last: None,
        }
    }

    /// Line and instruction that the next step will execute.
    pub fn current(&self) -> Option<(u32, &'p Instruction)> {
        if self.state.is_halted() {
            return None;
        }
        let pc = self.state.pc();
        Some((self.program.line_of(pc)?, self.program.get(pc)?))
    }

    /// Executes one instruction.
    pub fn step(&mut self) -> StepOutcome {
        let outcome = vm::step(self.program, &mut self.state);
        if let StepOutcome::Produced(value) = outcome {
            self.output.push(value);
        }
        // Keep the outcome that ended the session rather than the rejection
        // of later steps.
        let rejected = matches!(
            &outcome,
            StepOutcome::Faulted(fault) if fault.kind == FaultKind::AlreadyHalted
        );
        if !rejected {
            self.last = Some(outcome.clone());
        }
        outcome
    }

    /// Stack contents ordered bottom to top.
    pub fn stack(&self) -> &[i64] {
        self.state.stack()
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Values printed so far, in execution order.
    pub fn output(&self) -> &[i64] {
        &self.output
    }

    /// Outcome of the most recent executed step.
    pub fn last_outcome(&self) -> Option<&StepOutcome> {
        self.last.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_halted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::loader::load_source;

    #[test]
    fn current_tracks_program_counter() {
        let program = load_source("INPP\n\nCRCT 2\nPARA").unwrap();
        let mut session = DebugSession::new(&program);

        assert_eq!(session.current(), Some((1, &Instruction::BeginProgram {})));
        session.step();
        assert_eq!(
            session.current(),
            Some((3, &Instruction::PushConstant { value: 2 }))
        );
        session.step();
        assert_eq!(session.stack(), &[2]);
        assert_eq!(session.state().pc(), 2);
        assert_eq!(session.step(), StepOutcome::Halted);
        assert!(session.is_finished());
        assert_eq!(session.current(), None);
    }

    #[test]
    fn output_collects_printed_values() {
        let program = load_source("CRCT 1\nIMPR\nCRCT 2\nIMPR\nPARA").unwrap();
        let mut session = DebugSession::new(&program);
        while !session.step().is_terminal() {}
        assert_eq!(session.output(), &[1, 2]);
        assert_eq!(session.last_outcome(), Some(&StepOutcome::Halted));
    }

    #[test]
    fn stepping_after_halt_keeps_final_outcome() {
        let program = load_source("PARA").unwrap();
        let mut session = DebugSession::new(&program);
        assert_eq!(session.step(), StepOutcome::Halted);
        assert!(matches!(
            session.step(),
            StepOutcome::Faulted(fault) if fault.kind == FaultKind::AlreadyHalted
        ));
        assert_eq!(session.last_outcome(), Some(&StepOutcome::Halted));
    }
}
