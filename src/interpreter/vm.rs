//! Execution engine.
//!
//! [`step`] executes exactly one instruction of a [`Program`] against an
//! [`ExecutionState`]. Full-speed execution ([`run`]) and single-step
//! debugging ([`DebugSession`](super::debugger::DebugSession)) are both built on
//! it, so the two modes cannot drift apart.
//!
//! Binary operations pop the right operand first: for `a` pushed before `b`,
//! `SUBT` yields `a - b` and `CMME` yields `a < b`. Arithmetic wraps on
//! overflow and `DIVI` rounds toward negative infinity.

use crate::debug;
use crate::interpreter::errors::{FaultKind, RuntimeFault};
use crate::interpreter::isa::Instruction;
use crate::interpreter::program::Program;
use crate::interpreter::state::ExecutionState;

/// Result of executing exactly one instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// Instruction executed, execution may proceed.
    Continued,
    /// `IMPR` emitted a value, execution may proceed.
    Produced(i64),
    /// `PARA` executed; the state is halted.
    Halted,
    /// Unrecoverable condition; the state is halted.
    Faulted(RuntimeFault),
}

impl StepOutcome {
    /// Whether the session can take another step after this outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Halted | StepOutcome::Faulted(_))
    }
}

/// Receives values produced by `IMPR` during a full run.
pub trait Observer {
    fn produced(&mut self, value: i64);
}

impl<F: FnMut(i64)> Observer for F {
    fn produced(&mut self, value: i64) {
        self(value)
    }
}

/// What an instruction does to control flow once its operands are handled.
enum Effect {
    Advance,
    Emit(i64),
    Jump(usize),
    Halt,
}

/// Executes the instruction at `state.pc()`.
///
/// Faults and `PARA` set the halted flag; stepping a halted state reports
/// [`FaultKind::AlreadyHalted`] and leaves it untouched. Falling through the
/// last instruction faults on the following step.
pub fn step(program: &Program, state: &mut ExecutionState) -> StepOutcome {
    let pc = state.pc;
    if state.halted {
        return StepOutcome::Faulted(RuntimeFault::new(pc, FaultKind::AlreadyHalted));
    }

    let Some(instr) = program.get(pc) else {
        state.halted = true;
        return StepOutcome::Faulted(RuntimeFault::new(
            pc,
            FaultKind::PcOutOfRange {
                pc,
                len: program.len(),
            },
        ));
    };

    match exec(instr, state) {
        Ok(Effect::Advance) => {
            state.pc = pc + 1;
            StepOutcome::Continued
        }
        Ok(Effect::Emit(value)) => {
            state.pc = pc + 1;
            StepOutcome::Produced(value)
        }
        Ok(Effect::Jump(target)) => {
            state.pc = target;
            StepOutcome::Continued
        }
        Ok(Effect::Halt) => {
            state.halted = true;
            StepOutcome::Halted
        }
        Err(kind) => {
            state.halted = true;
            StepOutcome::Faulted(RuntimeFault::new(pc, kind))
        }
    }
}

/// Runs until `PARA` or a fault, handing every printed value to `observer`.
///
/// Returns the number of executed steps. With a `step_limit`, the run faults
/// with [`FaultKind::StepLimitExceeded`] once that many steps have executed
/// without halting.
pub fn run<O: Observer>(
    program: &Program,
    state: &mut ExecutionState,
    observer: &mut O,
    step_limit: Option<u64>,
) -> Result<u64, RuntimeFault> {
    let mut steps = 0u64;
    loop {
        if let Some(limit) = step_limit
            && steps >= limit
        {
            state.halted = true;
            return Err(RuntimeFault::new(
                state.pc,
                FaultKind::StepLimitExceeded { limit },
            ));
        }

        let outcome = step(program, state);
        steps += 1;
        match outcome {
            StepOutcome::Continued => {}
            StepOutcome::Produced(value) => observer.produced(value),
            StepOutcome::Halted => {
                debug!("halted after {steps} step(s)");
                return Ok(steps);
            }
            StepOutcome::Faulted(fault) => return Err(fault),
        }
    }
}

fn exec(instr: &Instruction, state: &mut ExecutionState) -> Result<Effect, FaultKind> {
    let mnemonic = instr.opcode().mnemonic();
    match *instr {
        // Program bracket
        Instruction::BeginProgram {} | Instruction::NoOp {} => Ok(Effect::Advance),
        Instruction::Halt {} => Ok(Effect::Halt),
        // Memory sizing
        Instruction::Allocate { count } => {
            state.allocate(count)?;
            Ok(Effect::Advance)
        }
        Instruction::Deallocate { count } => {
            state.deallocate(count)?;
            Ok(Effect::Advance)
        }
        // Stack push / store
        Instruction::PushConstant { value } => {
            state.push(value);
            Ok(Effect::Advance)
        }
        Instruction::Load { offset } => {
            let value = state.read(offset)?;
            state.push(value);
            Ok(Effect::Advance)
        }
        Instruction::Store { offset } => op_store(state, mnemonic, offset),
        // Arithmetic
        Instruction::Add {} => op_binary(state, mnemonic, |a, b| Ok(a.wrapping_add(b))),
        Instruction::Subtract {} => op_binary(state, mnemonic, |a, b| Ok(a.wrapping_sub(b))),
        Instruction::Multiply {} => op_binary(state, mnemonic, |a, b| Ok(a.wrapping_mul(b))),
        Instruction::Divide {} => op_binary(state, mnemonic, floor_div),
        Instruction::Negate {} => {
            let value = state.pop(mnemonic)?;
            state.push(value.wrapping_neg());
            Ok(Effect::Advance)
        }
        // Logic / comparison
        Instruction::And {} => op_binary(state, mnemonic, |a, b| Ok(truth(a != 0 && b != 0))),
        Instruction::Or {} => op_binary(state, mnemonic, |a, b| Ok(truth(a != 0 || b != 0))),
        Instruction::Less {} => op_binary(state, mnemonic, |a, b| Ok(truth(a < b))),
        Instruction::LessEqual {} => op_binary(state, mnemonic, |a, b| Ok(truth(a <= b))),
        Instruction::Equal {} => op_binary(state, mnemonic, |a, b| Ok(truth(a == b))),
        Instruction::NotEqual {} => op_binary(state, mnemonic, |a, b| Ok(truth(a != b))),
        Instruction::GreaterEqual {} => op_binary(state, mnemonic, |a, b| Ok(truth(a >= b))),
        Instruction::Greater {} => op_binary(state, mnemonic, |a, b| Ok(truth(a > b))),
        // Control flow
        Instruction::Jump { target } => Ok(Effect::Jump(target)),
        Instruction::JumpIfFalse { target } => {
            if state.pop(mnemonic)? == 0 {
                Ok(Effect::Jump(target))
            } else {
                Ok(Effect::Advance)
            }
        }
        Instruction::Print {} => Ok(Effect::Emit(state.pop(mnemonic)?)),
    }
}

fn op_store(
    state: &mut ExecutionState,
    mnemonic: &'static str,
    offset: usize,
) -> Result<Effect, FaultKind> {
    // Bounds first so a bad offset leaves the stack intact.
    state.read(offset)?;
    let value = state.pop(mnemonic)?;
    state.write(offset, value)?;
    Ok(Effect::Advance)
}

/// Pops `(a, b)` with `b` on top and pushes `f(a, b)`.
fn op_binary(
    state: &mut ExecutionState,
    mnemonic: &'static str,
    f: impl FnOnce(i64, i64) -> Result<i64, FaultKind>,
) -> Result<Effect, FaultKind> {
    let (a, b) = state.pop_pair(mnemonic)?;
    state.push(f(a, b)?);
    Ok(Effect::Advance)
}

const fn truth(cond: bool) -> i64 {
    if cond { 1 } else { 0 }
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Result<i64, FaultKind> {
    if b == 0 {
        return Err(FaultKind::DivisionByZero);
    }
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}
