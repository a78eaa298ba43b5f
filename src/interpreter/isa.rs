//! Instruction set definitions.
//!
//! The [`for_each_instruction!`](crate::for_each_instruction) macro holds the
//! canonical MEPA instruction table and invokes a callback macro with it, so
//! the opcode enum, the typed instruction enum and the line decoder of the
//! [`loader`](super::loader) are all generated from one list.
//!
//! This module generates:
//! - [`Opcode`]: the closed set of mnemonics, with lookup and arity
//! - [`Instruction`]: a decoded instruction carrying its typed operand
//!
//! # Operand kinds
//!
//! - `Count`: non-negative number of memory positions (`AMEM`, `DMEM`)
//! - `Int`: signed integer literal (`CRCT`)
//! - `Addr`: non-negative memory offset (`CRVL`, `ARMZ`)
//! - `Target`: jump target (`DSVS`, `DSVF`), generic so the loader can hold
//!   unresolved labels before producing `Instruction<usize>`

use std::fmt;

/// Invokes a callback macro with the complete instruction definition list.
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Program bracket
            // =========================
            /// INPP ; marks the start of the program
            BeginProgram = "INPP" => [],
            /// PARA ; halts execution
            Halt = "PARA" => [],
            // =========================
            // Memory sizing
            // =========================
            /// AMEM n ; grows memory by n zero-filled positions
            Allocate = "AMEM" => [count: Count],
            /// DMEM n ; shrinks memory by n positions
            Deallocate = "DMEM" => [count: Count],
            // =========================
            // Stack push / store
            // =========================
            /// CRCT k ; push k
            PushConstant = "CRCT" => [value: Int],
            /// CRVL n ; push memory[n]
            Load = "CRVL" => [offset: Addr],
            /// ARMZ n ; memory[n] = pop
            Store = "ARMZ" => [offset: Addr],
            // =========================
            // Arithmetic
            // =========================
            /// SOMA ; push a + b
            Add = "SOMA" => [],
            /// SUBT ; push a - b
            Subtract = "SUBT" => [],
            /// MULT ; push a * b
            Multiply = "MULT" => [],
            /// DIVI ; push a / b rounded toward negative infinity (trap on zero)
            Divide = "DIVI" => [],
            /// INVR ; push -a
            Negate = "INVR" => [],
            // =========================
            // Logic / comparison
            // =========================
            /// CONJ ; push 1 if a and b are both nonzero, else 0
            And = "CONJ" => [],
            /// DISJ ; push 1 if a or b is nonzero, else 0
            Or = "DISJ" => [],
            /// CMME ; push a < b
            Less = "CMME" => [],
            /// CMEG ; push a <= b
            LessEqual = "CMEG" => [],
            /// CMIG ; push a == b
            Equal = "CMIG" => [],
            /// CMDG ; push a != b
            NotEqual = "CMDG" => [],
            /// CMAG ; push a >= b
            GreaterEqual = "CMAG" => [],
            /// CMMA ; push a > b
            Greater = "CMMA" => [],
            // =========================
            // Control flow
            // =========================
            /// DSVS target ; pc = target
            Jump = "DSVS" => [target: Target],
            /// DSVF target ; if pop == 0 then pc = target
            JumpIfFalse = "DSVF" => [target: Target],
            /// NADA ; does nothing
            NoOp = "NADA" => [],
            /// IMPR ; emits pop
            Print = "IMPR" => [],
        }
    };
}

#[macro_export]
macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $mnemonic:literal => [
                $( $field:ident : $kind:ident ),* $(,)?
            ]
        ),* $(,)?
    ) => {
        // =========================
        // Opcode enum
        // =========================
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $name,
            )*
        }

        impl Opcode {
            /// Every opcode in table order.
            pub const ALL: &'static [Opcode] = &[ $( Opcode::$name ),* ];

            /// Returns the assembly mnemonic for this opcode.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }

            /// Looks up an opcode by mnemonic, ignoring ASCII case.
            pub fn from_mnemonic(name: &str) -> Option<Self> {
                $(
                    if name.eq_ignore_ascii_case($mnemonic) {
                        return Some(Opcode::$name);
                    }
                )*
                None
            }

            /// Number of operands the opcode takes.
            pub const fn arity(&self) -> usize {
                match self {
                    $(
                        Opcode::$name => {
                            <[()]>::len(&[ $( $crate::define_instructions!(@unit $field) ),* ])
                        }
                    )*
                }
            }
        }

        // =========================
        // Decoded instruction
        // =========================
        #[derive(Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Instruction<T = usize> {
            $(
                $(#[$doc])*
                $name {
                    $( $field: <$crate::interpreter::isa::kinds::$kind as $crate::interpreter::isa::kinds::OperandKind<T>>::Ty ),*
                },
            )*
        }

        impl<T> Instruction<T> {
            /// Returns the opcode of this instruction.
            pub const fn opcode(&self) -> Opcode {
                match self {
                    $( Instruction::$name { .. } => Opcode::$name, )*
                }
            }

            /// Rewrites the jump target of the instruction, leaving every other
            /// operand untouched.
            pub fn map_target<U, E>(
                self,
                mut f: impl FnMut(T) -> Result<U, E>,
            ) -> Result<Instruction<U>, E> {
                Ok(match self {
                    $(
                        Instruction::$name { $( $field ),* } => Instruction::$name {
                            $( $field: $crate::define_instructions!(@map $kind, $field, f) ),*
                        },
                    )*
                })
            }
        }

        impl<T: ::std::fmt::Display> ::std::fmt::Display for Instruction<T> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(
                        Instruction::$name { $( $field ),* } => {
                            f.write_str($mnemonic)?;
                            $( write!(f, " {}", $field)?; )*
                            Ok(())
                        }
                    )*
                }
            }
        }
    };

    (@unit $x:ident) => { () };

    // ---------- target rewriting ----------
    (@map Target, $v:ident, $f:ident) => { $f($v)? };
    (@map $kind:ident, $v:ident, $f:ident) => { $v };
}

/// Operand kinds named in the instruction table, mapped to field types.
pub mod kinds {
    /// Field type of an operand kind in an `Instruction<T>`.
    pub trait OperandKind<T> {
        type Ty;
    }

    pub enum Count {}
    pub enum Int {}
    pub enum Addr {}
    pub enum Target {}

    impl<T> OperandKind<T> for Count {
        type Ty = usize;
    }

    impl<T> OperandKind<T> for Int {
        type Ty = i64;
    }

    impl<T> OperandKind<T> for Addr {
        type Ty = usize;
    }

    impl<T> OperandKind<T> for Target {
        type Ty = T;
    }
}

for_each_instruction!(define_instructions);

/// Jump operand as written in source, before label resolution.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum JumpTarget {
    /// Raw instruction index.
    Index(usize),
    /// Label name, normalised to upper case.
    Label(String),
}

impl fmt::Display for JumpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpTarget::Index(index) => write!(f, "{index}"),
            JumpTarget::Label(label) => f.write_str(label),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
