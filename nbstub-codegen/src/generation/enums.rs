//! Shared base classes for binding-layer enumerations.
//!
//! Every enumeration exposes the same accessors and operator overloads.
//! Rather than repeat them in each class body, enumerations derive from
//! `_Enum` (or `_EnumArith` when they support arithmetic), which are
//! declared once at the top of the stub.

use indexmap::IndexMap;
use nbstub_model::ObjectId;

/// Operators supplied by the shared enumeration bases.
pub const ENUM_OPS: &[&str] = &[
    "add", "sub", "mul", "floordiv", "eq", "ne", "gt", "ge", "lt", "le", "index", "repr", "hash",
    "int", "rshift", "lshift", "and", "or", "xor", "neg", "abs", "invert",
];

pub const ENUM_BASE: &str = "_Enum";
pub const ENUM_ARITH_BASE: &str = "_EnumArith";

const ARITH_UNARY_OPS: &[&str] = &["abs", "neg", "invert"];
const ARITH_BINARY_OPS: &[&str] = &[
    "add", "sub", "mul", "floordiv", "lshift", "rshift", "and", "or", "xor",
];

/// Which shared bases the stub needs, collected while visiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumBases {
    plain: bool,
    arith: bool,
}

impl EnumBases {
    /// Record an enumeration and return the base it should derive from.
    pub fn record(&mut self, arithmetic: bool) -> &'static str {
        self.plain = true;
        self.arith |= arithmetic;
        if arithmetic {
            ENUM_ARITH_BASE
        } else {
            ENUM_BASE
        }
    }

    /// Declarations of the bases recorded so far.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.plain {
            return out;
        }

        out.push_str(&format!("class {ENUM_BASE}:\n"));
        out.push_str("    def __init__(self, arg: object, /) -> None: ...\n");
        for (op, ret) in [("repr", "str"), ("hash", "int"), ("int", "int"), ("index", "int")] {
            out.push_str(&format!("    def __{op}__(self, /) -> {ret}: ...\n"));
        }
        for op in ["eq", "ne", "gt", "ge", "lt", "le"] {
            out.push_str(&format!("    def __{op}__(self, arg: object, /) -> bool: ...\n"));
        }
        out.push_str("    def name(self, /) -> str: ...\n");
        out.push_str("    def value(self, /) -> int: ...\n");
        out.push('\n');

        if !self.arith {
            return out;
        }

        out.push_str(&format!("class {ENUM_ARITH_BASE}({ENUM_BASE}):\n"));
        for op in ARITH_UNARY_OPS {
            out.push_str(&format!("    def __{op}__(self) -> int: ...\n"));
        }
        for op in ARITH_BINARY_OPS {
            out.push_str(&format!("    def __{op}__(self, arg: object, /) -> int: ...\n"));
            out.push_str(&format!("    def __r{op}__(self, arg: object, /) -> int: ...\n"));
        }
        out.push('\n');
        out
    }
}

/// An enumeration supports arithmetic when it defines `__add__`.
pub fn is_arithmetic(members: &IndexMap<String, ObjectId>) -> bool {
    members.contains_key("__add__")
}

/// Drop the members the shared bases already declare.
pub fn strip_enum_members(members: &mut IndexMap<String, ObjectId>) {
    members.shift_remove("name");
    members.shift_remove("value");
    for op in ENUM_OPS {
        members.shift_remove(&format!("__{op}__"));
        members.shift_remove(&format!("__r{op}__"));
    }
}
