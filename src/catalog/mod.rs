//! Static ZX16 metadata: instructions, registers, directives and the
//! predefined constants. Everything here is read-only and built at compile time.

use phf::phf_set;

mod constants;
mod directives;
mod instructions;
mod registers;

pub use constants::{is_default_constant, lookup_default_constant, DefaultConstant, DEFAULT_CONSTANTS};
pub use directives::{lookup_directive, sorted_directives, DirectiveSpec, DIRECTIVES};
pub use instructions::{
    lookup_instruction, sorted_instructions, Category, InstructionSpec, INSTRUCTIONS,
};
pub use registers::{alias_of, lookup_register, RegisterSpec, REGISTERS};

/// Branch and jump mnemonics whose last operand is a code label.
pub static CONTROL_TRANSFER: phf::Set<&'static str> = phf_set! {
    "j", "jal", "beq", "bne", "bz", "bnz", "blt", "bge", "bltu", "bgeu", "call",
};

/// Instructions whose last operand is an immediate.
pub static IMMEDIATE_OPERAND: phf::Set<&'static str> = phf_set! {
    "li", "addi", "slti", "sltui", "ori", "andi", "xori", "slli", "srli", "srai",
};

pub const LOAD_ADDRESS: &str = "la";
