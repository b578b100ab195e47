//! Expression, type and signature rendering.
//!
//! - [`Canonicalizer`] - Rewrites qualified type names and registers imports
//! - [`ExprRenderer`] - Values, types and signatures as Python source
//! - [`str_repr`] / [`float_repr`] - Python literal spelling

mod canonical;
mod expr;
mod literal;
mod signature;

pub use canonical::{Canonicalizer, strip_variance_markers};
pub use expr::ExprRenderer;
pub use literal::{float_repr, str_repr};
