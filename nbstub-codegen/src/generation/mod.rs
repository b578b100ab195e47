//! Output management.
//!
//! - [`ImportResolver`] - Import requirements and collision-free aliases
//! - [`EnumBases`] - Shared enumeration base classes

mod enums;
mod imports;

pub use enums::{
    ENUM_ARITH_BASE, ENUM_BASE, ENUM_OPS, EnumBases, is_arithmetic, strip_enum_members,
};
pub use imports::{ImportResolver, MAX_ALIAS_ATTEMPTS};
