//! Stub (`.pyi`) synthesis for binding-layer extension modules.
//!
//! This crate walks an [`ObjectGraph`](nbstub_model::ObjectGraph) from its
//! root module and renders a typing stub: signatures from binding-layer
//! templates or reflective signatures, canonical type names with the imports
//! they require, compacted enumerations and inline default values.
//!
//! # Module Organization
//!
//! - [`builder`] - Output building blocks (OutputBuffer, docstring formatting)
//! - [`generation`] - Output management (ImportResolver, EnumBases)
//! - [`render`] - Expression, type and signature rendering
//!
//! # Example
//!
//! ```
//! use nbstub_codegen::{StubConfig, generate_stub};
//! use nbstub_model::{Module, Object, ObjectGraph, Value, ValueData};
//!
//! let mut graph = ObjectGraph::new();
//! let answer = graph.push(Object::Value(Value::builtin(ValueData::Int(42))));
//! let root = graph.push(Object::Module(Module::new("ext").member("ANSWER", answer)));
//! graph.set_root(root);
//!
//! let output = generate_stub(&graph, StubConfig::default(), None).unwrap();
//! assert_eq!(output.stub, "ANSWER: int = 42\n");
//! ```

pub mod builder;
pub mod generation;
pub mod render;

mod config;
mod error;
mod generator;

pub use config::{PythonVersion, StubConfig};
pub use error::{Error, Result};
pub use generator::{StubGen, StubOutput, generate_stub};
