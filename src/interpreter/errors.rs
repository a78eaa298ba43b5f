use mepa_derive::Error;

/// Malformed source detected while decoding a single line.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SyntaxFault {
    /// Mnemonic not part of the instruction set.
    #[error("line {line}: unknown instruction '{mnemonic}'")]
    UnknownInstruction { line: u32, mnemonic: String },
    /// Wrong number of operands for an instruction.
    #[error("line {line}: {mnemonic} expects {expected} operand(s), got {actual}")]
    ArityMismatch {
        line: u32,
        mnemonic: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Operand token does not fit the operand kind of the instruction.
    #[error("line {line}: {mnemonic} expects {expected}, got '{token}'")]
    InvalidOperand {
        line: u32,
        mnemonic: &'static str,
        expected: &'static str,
        token: String,
    },
    /// Label definition with an empty or non-identifier name.
    #[error("line {line}: malformed label definition '{token}'")]
    MalformedLabel { line: u32, token: String },
}

/// Label table inconsistencies detected while resolving jump targets.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResolutionFault {
    /// Label defined more than once.
    #[error("line {line}: label {label} already defined at line {first_line}")]
    DuplicateLabel {
        label: String,
        first_line: u32,
        line: u32,
    },
    /// Jump to a label that is never defined.
    #[error("line {line}: undefined label {label}")]
    UndefinedLabel { label: String, line: u32 },
    /// Jump target does not name an instruction of the program.
    #[error("line {line}: jump target {target} outside program of {len} instruction(s)")]
    TargetOutOfRange {
        target: String,
        line: u32,
        len: usize,
    },
}

/// Reason a program was rejected by the loader.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LoadError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxFault),
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionFault),
}

impl LoadError {
    /// Source line the error points at.
    pub fn line(&self) -> u32 {
        match self {
            LoadError::Syntax(
                SyntaxFault::UnknownInstruction { line, .. }
                | SyntaxFault::ArityMismatch { line, .. }
                | SyntaxFault::InvalidOperand { line, .. }
                | SyntaxFault::MalformedLabel { line, .. },
            ) => *line,
            LoadError::Resolution(
                ResolutionFault::DuplicateLabel { line, .. }
                | ResolutionFault::UndefinedLabel { line, .. }
                | ResolutionFault::TargetOutOfRange { line, .. },
            ) => *line,
        }
    }
}

/// Unrecoverable runtime conditions. Every fault ends the execution session.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FaultKind {
    /// Pop on a stack holding fewer values than the instruction needs.
    #[error("stack underflow: {mnemonic} needs {needed} value(s), stack holds {available}")]
    StackUnderflow {
        mnemonic: &'static str,
        needed: usize,
        available: usize,
    },
    /// Integer division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// Load or store outside the allocated memory range.
    #[error("memory offset {offset} outside allocated range of {allocated} position(s)")]
    MemoryOutOfBounds { offset: usize, allocated: usize },
    /// AMEM growing memory past the session ceiling.
    #[error("cannot allocate {requested} position(s) on top of {allocated}, limit is {limit}")]
    AllocationTooLarge {
        requested: usize,
        allocated: usize,
        limit: usize,
    },
    /// DMEM releasing more positions than are allocated.
    #[error("cannot deallocate {requested} position(s), only {allocated} allocated")]
    DeallocationExceedsAllocated { requested: usize, allocated: usize },
    /// Program counter ran past the last instruction without PARA.
    #[error("program counter {pc} ran off the end of a {len}-instruction program without PARA")]
    PcOutOfRange { pc: usize, len: usize },
    /// Step requested on a state that has already halted or faulted.
    #[error("execution already finished")]
    AlreadyHalted,
    /// RUN exceeded the configured step ceiling.
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
}

/// A runtime fault together with the instruction index that raised it.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("instruction {pc}: {kind}")]
pub struct RuntimeFault {
    pub pc: usize,
    pub kind: FaultKind,
}

impl RuntimeFault {
    pub fn new(pc: usize, kind: FaultKind) -> Self {
        Self { pc, kind }
    }
}
