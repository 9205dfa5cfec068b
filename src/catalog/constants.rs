#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultConstant {
    pub name: &'static str,
    pub value: &'static str,
    pub description: &'static str,
}

/// Predefined symbols every program can reference without declaring them.
pub static DEFAULT_CONSTANTS: [DefaultConstant; 11] = [
    DefaultConstant { name: "WORD_SIZE", value: "2", description: "Size of a machine word in bytes" },
    DefaultConstant { name: "ADDRESS_SIZE", value: "2", description: "Size of an address in bytes" },
    DefaultConstant { name: "INSTRUCTION_SIZE", value: "2", description: "Size of one encoded instruction in bytes" },
    DefaultConstant { name: "REGISTER_COUNT", value: "8", description: "Number of architectural registers" },
    DefaultConstant { name: "RESET_VECTOR", value: "0x0000", description: "Address execution starts from after reset" },
    DefaultConstant { name: "INT_VECTORS", value: "0x0000", description: "Start of the interrupt vector table" },
    DefaultConstant { name: "CODE_START", value: "0x0020", description: "Default start of the .text section" },
    DefaultConstant { name: "MMIO_BASE", value: "0xF000", description: "Base address of memory-mapped I/O" },
    DefaultConstant { name: "MMIO_SIZE", value: "0x1000", description: "Size of the memory-mapped I/O region" },
    DefaultConstant { name: "STACK_TOP", value: "0xEFFE", description: "Initial stack pointer" },
    DefaultConstant { name: "MEM_SIZE", value: "0x10000", description: "Total addressable memory (64 KiB)" },
];

/// Case-sensitive lookup.
pub fn lookup_default_constant(name: &str) -> Option<&'static DefaultConstant> {
    DEFAULT_CONSTANTS.iter().find(|c| c.name == name)
}

pub fn is_default_constant(name: &str) -> bool {
    lookup_default_constant(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(lookup_default_constant("STACK_TOP").map(|c| c.value), Some("0xEFFE"));
        assert!(lookup_default_constant("stack_top").is_none());
    }

    #[test]
    fn names_are_upper_snake_case() {
        for c in DEFAULT_CONSTANTS.iter() {
            assert!(c.name.chars().all(|ch| ch.is_ascii_uppercase() || ch == '_'));
        }
    }
}
