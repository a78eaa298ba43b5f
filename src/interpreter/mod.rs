//! MEPA stack-machine interpreter.
//!
//! Source lines go through the [`loader`] into a resolved [`program::Program`],
//! which the [`vm`] stepper executes against a fresh [`state::ExecutionState`]
//! per session.
//!
//! # Execution model
//!
//! - **Stack**: unbounded `i64` operand stack, displayed bottom to top
//! - **Memory**: flat region grown by `AMEM` and shrunk by `DMEM`, zero-filled,
//!   capped at [`state::MAX_MEMORY`] positions
//! - **Control**: `DSVS`/`DSVF` jump to labels or to instruction indices
//!   counted from 0, never to source line numbers
//! - **Faults**: every runtime fault halts the session
//!
//! # Modules
//!
//! - [`debugger`]: Single-step sessions for the `DEBUG` command
//! - [`errors`]: Load-time and runtime fault types
//! - [`isa`]: Instruction set definition and mnemonic mappings
//! - [`loader`]: Two-pass decoding and label resolution
//! - [`program`]: Resolved instruction sequence and label table
//! - [`state`]: Stack, memory and control registers of one session
//! - [`vm`]: The stepper and the full-run loop

pub mod debugger;
pub mod errors;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod loader;
pub mod program;
pub mod state;
pub mod vm;
