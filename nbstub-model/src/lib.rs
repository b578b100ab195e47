//! Reflected object graph for the nbstub stub generator.
//!
//! This crate describes the live objects of an extension module (modules,
//! types, functions, properties, enumeration members and plain values) as a
//! closed set of variants stored in an arena. Entities refer to each other by
//! [`ObjectId`], so circular references are ordinary edges in the graph.
//!
//! # Architecture
//!
//! ```text
//! exporter (JSON dump) → nbstub-model (ObjectGraph) → nbstub-codegen (.pyi text)
//! ```

mod error;
mod function;
mod graph;
mod object;
mod serde_helpers;
mod value;

pub use error::{ModelError, Result};
pub use function::{
    Callable, DefaultArg, Function, FunctionKind, Overload, ParamKind, Parameter,
    ReflectedOverload, Signature,
};
pub use graph::ObjectGraph;
pub use object::{
    ENUM_ENTRIES, EnumMember, ForwardRef, Module, Object, ObjectId, Property, StaticProperty,
    TypeObject, TypeVar, TypeVarTuple, TypingForm,
};
pub use value::{QualName, Value, ValueData};
