//! MEPA interpreter library.
//!
//! Provides the stack-machine interpreter, the line-numbered source buffer
//! and the interactive command loop built on them.

pub mod config;
pub mod interpreter;
pub mod repl;
pub mod source;
pub mod utils;
