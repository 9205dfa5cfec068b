use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSpec {
    pub name: &'static str,
    /// Snippet inserted on completion, including the leading dot.
    pub template: &'static str,
    pub description: &'static str,
}

impl DirectiveSpec {
    /// The insertion snippet for when the dot has already been typed.
    pub fn template_after_dot(&self) -> &'static str {
        self.template.strip_prefix('.').unwrap_or(self.template)
    }
}

macro_rules! directive {
    ($name:literal, $template:literal, $desc:literal) => {
        DirectiveSpec {
            name: $name,
            template: $template,
            description: $desc,
        }
    };
}

/// Keyed without the leading dot.
pub static DIRECTIVES: phf::Map<&'static str, DirectiveSpec> = phf_map! {
    "text" => directive!(".text", ".text", "Switch to the code section. Code is placed from CODE_START (0x0020)."),
    "data" => directive!(".data", ".data", "Switch to the initialized data section, placed after the code."),
    "bss" => directive!(".bss", ".bss", "Switch to the uninitialized data section, placed after .data."),
    "org" => directive!(".org", ".org ${1:address}", "Set the location counter. Addresses below CODE_START select the interrupt vector area; the address must be even."),
    "byte" => directive!(".byte", ".byte ${1:value}", "Emit one or more 8-bit values (0-255)."),
    "word" => directive!(".word", ".word ${1:value}", "Emit one or more 16-bit little-endian values (0-65535)."),
    "string" => directive!(".string", ".string \"${1:text}\"", "Emit a NUL-terminated string."),
    "ascii" => directive!(".ascii", ".ascii \"${1:text}\"", "Emit a string without a terminator."),
    "space" => directive!(".space", ".space ${1:size}", "Reserve size zero-filled bytes."),
    "fill" => directive!(".fill", ".fill ${1:count}, ${2:size}, ${3:value}", "Emit count items of size bytes (1 or 2), each holding value."),
    "equ" => directive!(".equ", ".equ ${1:NAME}, ${2:value}", "Define a named constant. Redefining an .equ name is an error."),
    "set" => directive!(".set", ".set ${1:NAME}, ${2:value}", "Define or redefine a named constant."),
    "global" => directive!(".global", ".global ${1:symbol}", "Export a symbol for the linker."),
};

/// Case-insensitive lookup, with or without the leading dot.
pub fn lookup_directive(name: &str) -> Option<&'static DirectiveSpec> {
    let bare = name.strip_prefix('.').unwrap_or(name);
    DIRECTIVES.get(bare.to_ascii_lowercase().as_str())
}

pub fn sorted_directives() -> Vec<&'static DirectiveSpec> {
    let mut all: Vec<_> = DIRECTIVES.values().collect();
    all.sort_by_key(|d| d.name);
    all
}
