#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSpec {
    pub name: &'static str,
    pub alias: &'static str,
    pub purpose: &'static str,
}

impl RegisterSpec {
    /// The other name of this register, given one of its two names.
    pub fn partner_of(&self, name: &str) -> &'static str {
        if name.eq_ignore_ascii_case(self.name) {
            self.alias
        } else {
            self.name
        }
    }
}

pub static REGISTERS: [RegisterSpec; 8] = [
    RegisterSpec { name: "x0", alias: "t0", purpose: "Temporary register" },
    RegisterSpec { name: "x1", alias: "ra", purpose: "Return address" },
    RegisterSpec { name: "x2", alias: "sp", purpose: "Stack pointer" },
    RegisterSpec { name: "x3", alias: "s0", purpose: "Saved register / frame pointer" },
    RegisterSpec { name: "x4", alias: "s1", purpose: "Saved register" },
    RegisterSpec { name: "x5", alias: "t1", purpose: "Temporary register" },
    RegisterSpec { name: "x6", alias: "a0", purpose: "Argument / return value" },
    RegisterSpec { name: "x7", alias: "a1", purpose: "Argument / return value" },
];

/// Case-insensitive lookup by either the architectural name or the ABI alias.
pub fn lookup_register(name: &str) -> Option<&'static RegisterSpec> {
    REGISTERS
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(name) || r.alias.eq_ignore_ascii_case(name))
}

/// The partner name for a register name or alias.
pub fn alias_of(name: &str) -> Option<&'static str> {
    lookup_register(name).map(|r| r.partner_of(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_relation_is_symmetric() {
        for reg in REGISTERS.iter() {
            assert_eq!(alias_of(reg.name), Some(reg.alias));
            assert_eq!(alias_of(reg.alias), Some(reg.name));
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for reg in REGISTERS.iter() {
            assert!(seen.insert(reg.name));
            assert!(seen.insert(reg.alias));
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup_register("SP").map(|r| r.name), Some("x2"));
        assert_eq!(lookup_register("X6").map(|r| r.alias), Some("a0"));
        assert!(lookup_register("x8").is_none());
    }
}
