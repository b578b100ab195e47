//! Plain data values.

use serde::{Deserialize, Serialize};

use crate::{ObjectId, serde_helpers};

/// A `module` + `qualname` pair naming a runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualName {
    pub module: String,
    pub qualname: String,
}

impl QualName {
    pub fn new(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            qualname: qualname.into(),
        }
    }

    /// `module.qualname`, the spelling used before canonicalization.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.module, self.qualname)
    }
}

/// A plain data attribute: its runtime type plus the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub ty: QualName,
    pub data: ValueData,
}

impl Value {
    pub fn new(module: impl Into<String>, qualname: impl Into<String>, data: ValueData) -> Self {
        Self {
            ty: QualName::new(module, qualname),
            data,
        }
    }

    /// A value of a builtin type, with the type inferred from the data.
    pub fn builtin(data: ValueData) -> Self {
        let name = match &data {
            ValueData::None => "NoneType",
            ValueData::Ellipsis => "ellipsis",
            ValueData::Bool(_) => "bool",
            ValueData::Int(_) => "int",
            ValueData::Float(_) => "float",
            ValueData::Str(_) => "str",
            ValueData::List(_) => "list",
            ValueData::Tuple(_) => "tuple",
            ValueData::Dict(_) => "dict",
            ValueData::Opaque => "object",
        };
        Self::new("builtins", name, data)
    }
}

/// The data held by a [`Value`].
///
/// Containers refer to their elements by id so that elements of any kind
/// (types, enum members, nested containers) can appear inside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueData {
    None,
    Ellipsis,
    Bool(bool),
    Int(i64),
    Float(
        #[serde(
            serialize_with = "serde_helpers::serialize_float",
            deserialize_with = "serde_helpers::deserialize_float"
        )]
        f64,
    ),
    Str(String),
    List(Vec<ObjectId>),
    Tuple(Vec<ObjectId>),
    Dict(Vec<(ObjectId, ObjectId)>),
    /// A value with no source representation.
    Opaque,
}

impl ValueData {
    pub(crate) fn references(&self) -> Vec<ObjectId> {
        match self {
            ValueData::List(items) | ValueData::Tuple(items) => items.clone(),
            ValueData::Dict(entries) => entries.iter().flat_map(|(k, v)| [*k, *v]).collect(),
            _ => Vec::new(),
        }
    }
}
