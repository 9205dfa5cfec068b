use phf::phf_map;
use std::fmt;

/// Encoding family an instruction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    RegisterRegister,
    RegisterImmediate,
    Branch,
    Load,
    Store,
    Jump,
    UpperImmediate,
    System,
    Pseudo,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::RegisterRegister => "R-type",
            Category::RegisterImmediate => "I-type",
            Category::Branch => "B-type",
            Category::Load => "L-type",
            Category::Store => "S-type",
            Category::Jump => "J-type",
            Category::UpperImmediate => "U-type",
            Category::System => "System",
            Category::Pseudo => "Pseudo-instruction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionSpec {
    pub mnemonic: &'static str,
    pub category: Category,
    pub operands: &'static [&'static str],
    pub semantics: &'static str,
}

impl InstructionSpec {
    /// Plain syntax line, e.g. `beq rs1, rs2, label`.
    pub fn syntax(&self) -> String {
        if self.operands.is_empty() {
            self.mnemonic.to_string()
        } else {
            format!("{} {}", self.mnemonic, self.operands.join(", "))
        }
    }

    /// Snippet with one tab stop per operand placeholder.
    pub fn snippet(&self) -> String {
        if self.operands.is_empty() {
            return self.mnemonic.to_string();
        }
        let stops = self
            .operands
            .iter()
            .enumerate()
            .map(|(i, op)| format!("${{{}:{}}}", i + 1, op))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}", self.mnemonic, stops)
    }
}

macro_rules! inst {
    ($name:literal, $cat:ident, [$($op:literal),*], $sem:literal) => {
        InstructionSpec {
            mnemonic: $name,
            category: Category::$cat,
            operands: &[$($op),*],
            semantics: $sem,
        }
    };
}

pub static INSTRUCTIONS: phf::Map<&'static str, InstructionSpec> = phf_map! {
    // R-type
    "add" => inst!("add", RegisterRegister, ["rd", "rs2"], "rd = rd + rs2"),
    "sub" => inst!("sub", RegisterRegister, ["rd", "rs2"], "rd = rd - rs2"),
    "slt" => inst!("slt", RegisterRegister, ["rd", "rs2"], "rd = (rd < rs2) ? 1 : 0, signed compare"),
    "sltu" => inst!("sltu", RegisterRegister, ["rd", "rs2"], "rd = (rd < rs2) ? 1 : 0, unsigned compare"),
    "sll" => inst!("sll", RegisterRegister, ["rd", "rs2"], "rd = rd << (rs2 & 0xF)"),
    "srl" => inst!("srl", RegisterRegister, ["rd", "rs2"], "rd = rd >> (rs2 & 0xF), logical"),
    "sra" => inst!("sra", RegisterRegister, ["rd", "rs2"], "rd = rd >> (rs2 & 0xF), arithmetic"),
    "or" => inst!("or", RegisterRegister, ["rd", "rs2"], "rd = rd | rs2"),
    "and" => inst!("and", RegisterRegister, ["rd", "rs2"], "rd = rd & rs2"),
    "xor" => inst!("xor", RegisterRegister, ["rd", "rs2"], "rd = rd ^ rs2"),
    "mv" => inst!("mv", RegisterRegister, ["rd", "rs2"], "rd = rs2"),
    "jr" => inst!("jr", RegisterRegister, ["rd"], "pc = rd"),
    "jalr" => inst!("jalr", RegisterRegister, ["rd", "rs2"], "rd = pc + 2; pc = rs2"),
    // I-type
    "addi" => inst!("addi", RegisterImmediate, ["rd", "imm7"], "rd = rd + sext(imm7)"),
    "slti" => inst!("slti", RegisterImmediate, ["rd", "imm7"], "rd = (rd < sext(imm7)) ? 1 : 0, signed compare"),
    "sltui" => inst!("sltui", RegisterImmediate, ["rd", "imm7"], "rd = (rd < imm7) ? 1 : 0, unsigned compare"),
    "slli" => inst!("slli", RegisterImmediate, ["rd", "shamt"], "rd = rd << shamt"),
    "srli" => inst!("srli", RegisterImmediate, ["rd", "shamt"], "rd = rd >> shamt, logical"),
    "srai" => inst!("srai", RegisterImmediate, ["rd", "shamt"], "rd = rd >> shamt, arithmetic"),
    "ori" => inst!("ori", RegisterImmediate, ["rd", "imm7"], "rd = rd | sext(imm7)"),
    "andi" => inst!("andi", RegisterImmediate, ["rd", "imm7"], "rd = rd & sext(imm7)"),
    "xori" => inst!("xori", RegisterImmediate, ["rd", "imm7"], "rd = rd ^ sext(imm7)"),
    "li" => inst!("li", RegisterImmediate, ["rd", "imm7"], "rd = sext(imm7)"),
    // B-type
    "beq" => inst!("beq", Branch, ["rs1", "rs2", "label"], "if (rs1 == rs2) pc = label"),
    "bne" => inst!("bne", Branch, ["rs1", "rs2", "label"], "if (rs1 != rs2) pc = label"),
    "bz" => inst!("bz", Branch, ["rs1", "label"], "if (rs1 == 0) pc = label"),
    "bnz" => inst!("bnz", Branch, ["rs1", "label"], "if (rs1 != 0) pc = label"),
    "blt" => inst!("blt", Branch, ["rs1", "rs2", "label"], "if (rs1 < rs2) pc = label, signed compare"),
    "bge" => inst!("bge", Branch, ["rs1", "rs2", "label"], "if (rs1 >= rs2) pc = label, signed compare"),
    "bltu" => inst!("bltu", Branch, ["rs1", "rs2", "label"], "if (rs1 < rs2) pc = label, unsigned compare"),
    "bgeu" => inst!("bgeu", Branch, ["rs1", "rs2", "label"], "if (rs1 >= rs2) pc = label, unsigned compare"),
    // S-type
    "sb" => inst!("sb", Store, ["rs2", "offset(rs1)"], "mem[rs1 + sext(offset)] = rs2[7:0]"),
    "sw" => inst!("sw", Store, ["rs2", "offset(rs1)"], "mem16[rs1 + sext(offset)] = rs2"),
    // L-type
    "lb" => inst!("lb", Load, ["rd", "offset(rs1)"], "rd = sext(mem[rs1 + sext(offset)])"),
    "lw" => inst!("lw", Load, ["rd", "offset(rs1)"], "rd = mem16[rs1 + sext(offset)]"),
    "lbu" => inst!("lbu", Load, ["rd", "offset(rs1)"], "rd = zext(mem[rs1 + sext(offset)])"),
    // J-type
    "j" => inst!("j", Jump, ["label"], "pc = label"),
    "jal" => inst!("jal", Jump, ["rd", "label"], "rd = pc + 2; pc = label"),
    // U-type
    "lui" => inst!("lui", UpperImmediate, ["rd", "imm9"], "rd = imm9 << 7"),
    "auipc" => inst!("auipc", UpperImmediate, ["rd", "imm9"], "rd = pc + (imm9 << 7)"),
    // System
    "ecall" => inst!("ecall", System, ["service"], "Invoke system service number `service`"),
    // Pseudo-instructions
    "li16" => inst!("li16", Pseudo, ["rd", "imm16"], "Load a full 16-bit immediate: lui rd, imm16 >> 7; ori rd, imm16 & 0x7F"),
    "la" => inst!("la", Pseudo, ["rd", "label"], "Load the address of label: auipc rd, hi(label); addi rd, lo(label)"),
    "push" => inst!("push", Pseudo, ["rd"], "Push rd on the stack: addi sp, -2; sw rd, 0(sp)"),
    "pop" => inst!("pop", Pseudo, ["rd"], "Pop the stack into rd: lw rd, 0(sp); addi sp, 2"),
    "call" => inst!("call", Pseudo, ["label"], "Call a subroutine: jal ra, label"),
    "ret" => inst!("ret", Pseudo, [], "Return from a subroutine: jr ra"),
    "inc" => inst!("inc", Pseudo, ["rd"], "Increment: addi rd, 1"),
    "dec" => inst!("dec", Pseudo, ["rd"], "Decrement: addi rd, -1"),
    "neg" => inst!("neg", Pseudo, ["rd"], "Two's-complement negate: xori rd, -1; addi rd, 1"),
    "not" => inst!("not", Pseudo, ["rd"], "Bitwise complement: xori rd, -1"),
    "clr" => inst!("clr", Pseudo, ["rd"], "Clear register: xor rd, rd"),
    "nop" => inst!("nop", Pseudo, [], "No operation: add x0, x0"),
};

/// Case-insensitive instruction lookup.
pub fn lookup_instruction(name: &str) -> Option<&'static InstructionSpec> {
    INSTRUCTIONS.get(name.to_ascii_lowercase().as_str())
}

/// All instructions sorted by mnemonic.
pub fn sorted_instructions() -> Vec<&'static InstructionSpec> {
    let mut all: Vec<_> = INSTRUCTIONS.values().collect();
    all.sort_by_key(|spec| spec.mnemonic);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_mnemonics() {
        for (key, spec) in INSTRUCTIONS.entries() {
            assert_eq!(*key, spec.mnemonic);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup_instruction("ADDI").map(|s| s.mnemonic), Some("addi"));
        assert_eq!(lookup_instruction("Beq").map(|s| s.category), Some(Category::Branch));
        assert!(lookup_instruction("mov").is_none());
    }

    #[test]
    fn snippet_numbers_operands() {
        let beq = lookup_instruction("beq").unwrap();
        assert_eq!(beq.snippet(), "beq ${1:rs1}, ${2:rs2}, ${3:label}");
        assert_eq!(beq.syntax(), "beq rs1, rs2, label");
        assert_eq!(lookup_instruction("ret").unwrap().snippet(), "ret");
    }

    #[test]
    fn pseudo_count() {
        let pseudo = INSTRUCTIONS
            .values()
            .filter(|s| s.category == Category::Pseudo)
            .count();
        assert_eq!(pseudo, 12);
        assert_eq!(INSTRUCTIONS.len(), 53);
    }
}
