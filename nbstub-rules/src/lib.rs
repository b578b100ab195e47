//! Pattern rule files for the nbstub stub generator.
//!
//! A rule file is a sequence of blocks. Each block starts with a top-level
//! line ending in `:` that holds a regular expression; the indented lines
//! that follow replace whatever the generator would have emitted for any
//! entity whose dotted path matches it.
//!
//! ```text
//! # Replace the signature of a single function
//! ext\.Matrix\.__getitem__:
//!     def __getitem__(self, index: tuple[int, int], /) -> float:
//!         \doc
//!
//! # Drop every private helper
//! ext\._.*:
//! ```
//!
//! Two directives are recognized inside templates: `\doc` expands to the
//! matched entity's docstring, and `\from M import A [as B], ...` requests
//! imports without emitting any text.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod parse;
mod rule;

pub use error::{Error, Result, SourceContext};
pub use rule::{ImportSpec, Rule, RuleExpansion, RuleSet, TemplateLine};
