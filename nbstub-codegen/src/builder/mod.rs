//! Text building blocks.
//!
//! - [`OutputBuffer`] - Indented line accumulator
//! - [`format_docstring`] / [`dedent`] - Docstring normalization

mod docstring;
mod output;

pub use docstring::{dedent, format_docstring};
pub use output::{INDENT, OutputBuffer};
