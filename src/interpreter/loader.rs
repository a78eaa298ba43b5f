//! Program loader and label resolver.
//!
//! Turns numbered source lines into a [`Program`]. Uses
//! [`for_each_instruction!`](crate::for_each_instruction) to generate the
//! per-line decoder.
//!
//! # Syntax
//!
//! ```text
//! [LABEL:] MNEMONIC [operand]   # optional comment
//! ```
//!
//! - Mnemonics are case-insensitive (`CRCT`, `crct`)
//! - Labels are identifiers followed by `:` and are case-insensitive
//! - A label may stand alone on a line; it binds to the next instruction
//! - Integer operands are decimal (`42`, `-1`)
//! - Jump targets are an instruction index (`3`) or a label name (`L1`).
//!   A numeric target counts instructions from 0 and ignores source line
//!   numbers: in a buffer numbered `10`, `20`, `30`, `DSVS 1` jumps to the
//!   instruction on line `20`
//! - Comments start with `#`, whole-line or trailing
//!
//! Loading runs in two passes: the first decodes every instruction and
//! records label positions, the second replaces symbolic jump targets with
//! instruction indices. Forward references therefore resolve like backward
//! ones.

use crate::debug;
use crate::interpreter::errors::{LoadError, ResolutionFault, SyntaxFault};
use crate::interpreter::isa::{Instruction, JumpTarget, Opcode};
use crate::interpreter::program::Program;
use std::collections::HashMap;

const COMMENT_CHAR: char = '#';
const LABEL_SUFFIX: char = ':';

/// Label bookkeeping for a single load.
///
/// Only lives for the duration of [`load`]; the resolved program keeps a
/// plain name to index map.
struct LoadContext {
    /// Label name to `(instruction index, defining line)`.
    labels: HashMap<String, (usize, u32)>,
}

impl LoadContext {
    fn new() -> Self {
        Self {
            labels: HashMap::new(),
        }
    }

    /// Binds `name` to the instruction index it precedes.
    fn define_label(&mut self, name: String, index: usize, line: u32) -> Result<(), ResolutionFault> {
        if let Some((_, first_line)) = self.labels.get(&name) {
            return Err(ResolutionFault::DuplicateLabel {
                label: name,
                first_line: *first_line,
                line,
            });
        }
        self.labels.insert(name, (index, line));
        Ok(())
    }

    /// Resolves a jump operand to a valid instruction index.
    fn resolve_target(
        &self,
        target: JumpTarget,
        line: u32,
        len: usize,
    ) -> Result<usize, ResolutionFault> {
        let index = match &target {
            JumpTarget::Index(index) => *index,
            JumpTarget::Label(name) => {
                self.labels
                    .get(name)
                    .map(|(index, _)| *index)
                    .ok_or_else(|| ResolutionFault::UndefinedLabel {
                        label: name.clone(),
                        line,
                    })?
            }
        };

        if index >= len {
            return Err(ResolutionFault::TargetOutOfRange {
                target: target.to_string(),
                line,
                len,
            });
        }
        Ok(index)
    }
}

/// Splits a line into whitespace-separated tokens, dropping any comment.
fn tokenize(line: &str) -> Vec<&str> {
    line.split(COMMENT_CHAR)
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect()
}

/// Checks if a token is a label definition (ends with `:`).
fn is_label_def(tok: &str) -> bool {
    tok.ends_with(LABEL_SUFFIX)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Extracts and normalises the label name from a definition token.
fn label_name(line: u32, tok: &str) -> Result<String, SyntaxFault> {
    let name = &tok[..tok.len() - LABEL_SUFFIX.len_utf8()];
    if !is_identifier(name) {
        return Err(SyntaxFault::MalformedLabel {
            line,
            token: tok.to_string(),
        });
    }
    Ok(name.to_ascii_uppercase())
}

fn invalid_operand(line: u32, mnemonic: &'static str, expected: &'static str, tok: &str) -> SyntaxFault {
    SyntaxFault::InvalidOperand {
        line,
        mnemonic,
        expected,
        token: tok.to_string(),
    }
}

/// Parse a non-negative count operand.
fn parse_count(line: u32, mnemonic: &'static str, tok: &str) -> Result<usize, SyntaxFault> {
    tok.parse::<usize>()
        .map_err(|_| invalid_operand(line, mnemonic, "a non-negative count", tok))
}

/// Parse a signed integer literal.
fn parse_int(line: u32, mnemonic: &'static str, tok: &str) -> Result<i64, SyntaxFault> {
    tok.parse::<i64>()
        .map_err(|_| invalid_operand(line, mnemonic, "an integer", tok))
}

/// Parse a non-negative memory offset.
fn parse_addr(line: u32, mnemonic: &'static str, tok: &str) -> Result<usize, SyntaxFault> {
    tok.parse::<usize>()
        .map_err(|_| invalid_operand(line, mnemonic, "a memory offset", tok))
}

/// Parse an instruction index or a label reference.
fn parse_target(line: u32, mnemonic: &'static str, tok: &str) -> Result<JumpTarget, SyntaxFault> {
    if let Ok(index) = tok.parse::<usize>() {
        return Ok(JumpTarget::Index(index));
    }
    if is_identifier(tok) {
        return Ok(JumpTarget::Label(tok.to_ascii_uppercase()));
    }
    Err(invalid_operand(
        line,
        mnemonic,
        "an instruction index or label",
        tok,
    ))
}

macro_rules! define_decoder {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $mnemonic:literal => [
                $( $field:ident : $kind:ident ),* $(,)?
            ]
        ),* $(,)?
    ) => {
        /// Decodes the operands of `opcode`, leaving jump targets unresolved.
        fn decode_instruction(
            line: u32,
            opcode: Opcode,
            operands: &[&str],
        ) -> Result<Instruction<JumpTarget>, SyntaxFault> {
            let expected = opcode.arity();
            if operands.len() != expected {
                return Err(SyntaxFault::ArityMismatch {
                    line,
                    mnemonic: opcode.mnemonic(),
                    expected,
                    actual: operands.len(),
                });
            }

            match opcode {
                $(
                    Opcode::$name => {
                        #[allow(unused_mut, unused_variables)]
                        let mut it = operands.iter().copied();
                        Ok(Instruction::$name {
                            $(
                                $field: define_decoder!(
                                    @parse $kind, line, $mnemonic, it.next().unwrap_or_default()
                                )?,
                            )*
                        })
                    }
                )*
            }
        }
    };

    (@parse Count, $line:expr, $mnemonic:expr, $tok:expr) => { parse_count($line, $mnemonic, $tok) };
    (@parse Int, $line:expr, $mnemonic:expr, $tok:expr) => { parse_int($line, $mnemonic, $tok) };
    (@parse Addr, $line:expr, $mnemonic:expr, $tok:expr) => { parse_addr($line, $mnemonic, $tok) };
    (@parse Target, $line:expr, $mnemonic:expr, $tok:expr) => { parse_target($line, $mnemonic, $tok) };
}

crate::for_each_instruction!(define_decoder);

/// Decodes one instruction from its tokens (mnemonic first).
fn parse_instruction(line: u32, tokens: &[&str]) -> Result<Instruction<JumpTarget>, SyntaxFault> {
    let (mnemonic, operands) = tokens.split_first().ok_or(SyntaxFault::ArityMismatch {
        line,
        mnemonic: "<missing opcode>",
        expected: 1,
        actual: 0,
    })?;
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| SyntaxFault::UnknownInstruction {
        line,
        mnemonic: mnemonic.to_string(),
    })?;
    decode_instruction(line, opcode, operands)
}

/// Loads numbered source lines into a resolved [`Program`].
///
/// Lines are taken in iteration order; the numbers are only carried along for
/// diagnostics and listings. Blank and comment-only lines are skipped.
///
/// Pass 1 decodes every instruction and binds each label to the index of the
/// next emitted instruction. Pass 2 resolves every jump target against that
/// table. Nothing is returned unless both passes succeed.
pub fn load<I, S>(lines: I) -> Result<Program, LoadError>
where
    I: IntoIterator<Item = (u32, S)>,
    S: AsRef<str>,
{
    let mut ctx = LoadContext::new();
    let mut decoded: Vec<Instruction<JumpTarget>> = Vec::new();
    let mut line_numbers: Vec<u32> = Vec::new();

    // First pass: decode instructions, record label positions
    for (line, text) in lines {
        let tokens = tokenize(text.as_ref());
        let Some(first) = tokens.first() else {
            continue;
        };

        let instr_tokens = if is_label_def(first) {
            let name = label_name(line, first)?;
            ctx.define_label(name, decoded.len(), line)?;
            &tokens[1..]
        } else {
            &tokens[..]
        };

        if instr_tokens.is_empty() {
            continue;
        }

        decoded.push(parse_instruction(line, instr_tokens)?);
        line_numbers.push(line);
    }

    // Second pass: replace symbolic targets with instruction indices
    let len = decoded.len();
    let instructions = decoded
        .into_iter()
        .zip(line_numbers.iter())
        .map(|(instr, &line)| instr.map_target(|target| ctx.resolve_target(target, line, len)))
        .collect::<Result<Vec<_>, _>>()?;

    let labels = ctx
        .labels
        .into_iter()
        .map(|(name, (index, _))| (name, index))
        .collect();

    debug!("loaded {} instruction(s)", instructions.len());

    Ok(Program {
        instructions,
        lines: line_numbers,
        labels,
    })
}

/// Loads unnumbered source text, numbering lines from 1.
pub fn load_source(source: &str) -> Result<Program, LoadError> {
    load((1u32..).zip(source.lines()))
}
