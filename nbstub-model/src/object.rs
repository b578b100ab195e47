//! Reflected entity variants.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Callable, Function, Value};

/// Reserved member key that marks a type as a binding-layer enumeration.
pub const ENUM_ENTRIES: &str = "@entries";

/// Identity of an object within an [`ObjectGraph`](crate::ObjectGraph).
///
/// Two members bound to the same id are the same runtime object.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Position of the object in the graph arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live object exposed for introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Object {
    Module(Module),
    Type(TypeObject),
    Function(Function),
    Property(Property),
    StaticProperty(StaticProperty),
    EnumMember(EnumMember),
    TypeVar(TypeVar),
    TypeVarTuple(TypeVarTuple),
    ForwardRef(ForwardRef),
    TypingForm(TypingForm),
    Value(Value),
}

impl Object {
    /// Short lowercase name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Module(_) => "module",
            Object::Type(_) => "type",
            Object::Function(_) => "function",
            Object::Property(_) => "property",
            Object::StaticProperty(_) => "static_property",
            Object::EnumMember(_) => "enum_member",
            Object::TypeVar(_) => "type_var",
            Object::TypeVarTuple(_) => "type_var_tuple",
            Object::ForwardRef(_) => "forward_ref",
            Object::TypingForm(_) => "typing_form",
            Object::Value(_) => "value",
        }
    }

    /// Returns the module if this object is one.
    pub fn as_module(&self) -> Option<&Module> {
        match self {
            Object::Module(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the type if this object is one.
    pub fn as_type(&self) -> Option<&TypeObject> {
        match self {
            Object::Type(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the function if this object is one.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Object::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Type placeholders are kept even when their name looks private.
    pub fn is_type_parameter(&self) -> bool {
        matches!(self, Object::TypeVar(_) | Object::TypeVarTuple(_))
    }

    /// The object's own docstring, if it has one.
    ///
    /// Binding-layer functions carry one docstring per overload; the first
    /// non-empty one is returned.
    pub fn doc(&self) -> Option<&str> {
        let doc = match self {
            Object::Type(t) => t.doc.as_deref(),
            Object::Function(f) => match &f.callable {
                Callable::Binding { overloads } => overloads
                    .iter()
                    .filter_map(|o| o.doc.as_deref())
                    .find(|d| !d.is_empty()),
                Callable::Reflected { .. } => f.doc.as_deref(),
            },
            Object::Property(p) => p.doc.as_deref(),
            Object::StaticProperty(p) => p.doc.as_deref(),
            Object::EnumMember(m) => m.doc.as_deref(),
            _ => None,
        };
        doc.filter(|d| !d.is_empty())
    }

    /// All object ids this object refers to.
    pub fn references(&self) -> Vec<ObjectId> {
        match self {
            Object::Module(m) => m.members.values().copied().collect(),
            Object::Type(t) => t
                .members
                .values()
                .chain(t.bases.iter())
                .chain(t.orig_bases.iter().flatten())
                .copied()
                .collect(),
            Object::Function(f) => f.references(),
            Object::Property(p) => std::iter::once(p.getter).chain(p.setter).collect(),
            Object::StaticProperty(p) => vec![p.getter],
            Object::EnumMember(m) => vec![m.enum_type],
            Object::TypeVar(tv) => tv.constraints.iter().copied().chain(tv.bound).collect(),
            Object::Value(v) => v.data.references(),
            Object::TypeVarTuple(_) | Object::ForwardRef(_) | Object::TypingForm(_) => Vec::new(),
        }
    }
}

/// A module and its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Fully qualified module name (e.g. `pkg.ext`).
    pub name: String,
    /// Module attributes by name.
    #[serde(default)]
    pub members: IndexMap<String, ObjectId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: IndexMap::new(),
        }
    }

    /// Bind an attribute.
    pub fn member(mut self, name: impl Into<String>, id: ObjectId) -> Self {
        self.members.insert(name.into(), id);
        self
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<ObjectId> {
        self.members.get(name).copied()
    }
}

/// A class, possibly created by the binding layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeObject {
    pub name: String,
    pub qualname: String,
    /// Name of the module that defines the type.
    pub module: String,
    #[serde(default)]
    pub doc: Option<String>,
    /// Docstring of the wrapped enumeration definition (enums only).
    #[serde(default)]
    pub inner_doc: Option<String>,
    /// Class body in declaration order.
    #[serde(default)]
    pub members: IndexMap<String, ObjectId>,
    #[serde(default)]
    pub bases: Vec<ObjectId>,
    /// Generic origin bases, preferred over `bases` when present.
    #[serde(default)]
    pub orig_bases: Option<Vec<ObjectId>>,
    /// Custom class header supplied by the binding layer.
    #[serde(default)]
    pub signature: Option<String>,
    /// Whether the type was created by the binding layer.
    #[serde(default)]
    pub binding: bool,
}

impl TypeObject {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            qualname: name.clone(),
            name,
            module: module.into(),
            doc: None,
            inner_doc: None,
            members: IndexMap::new(),
            bases: Vec::new(),
            orig_bases: None,
            signature: None,
            binding: false,
        }
    }

    /// Set the docstring.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a class member.
    pub fn member(mut self, name: impl Into<String>, id: ObjectId) -> Self {
        self.members.insert(name.into(), id);
        self
    }

    /// Add a direct base.
    pub fn base(mut self, id: ObjectId) -> Self {
        self.bases.push(id);
        self
    }

    /// Mark as a binding-layer type.
    pub fn binding(mut self) -> Self {
        self.binding = true;
        self
    }

    /// Enumerations expose the reserved entries marker.
    pub fn is_enum(&self) -> bool {
        self.members.contains_key(ENUM_ENTRIES)
    }

    /// `module.qualname`, the spelling used before canonicalization.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.module, self.qualname)
    }
}

/// A `property` descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub getter: ObjectId,
    #[serde(default)]
    pub setter: Option<ObjectId>,
    #[serde(default)]
    pub doc: Option<String>,
}

/// A getter-only class-level data descriptor created by the binding layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticProperty {
    pub getter: ObjectId,
    #[serde(default)]
    pub doc: Option<String>,
}

/// An entry of an enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    /// The enumeration type this entry belongs to.
    pub enum_type: ObjectId,
    #[serde(default)]
    pub doc: Option<String>,
}

/// A `TypeVar` placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeVar {
    pub name: String,
    #[serde(default)]
    pub constraints: Vec<ObjectId>,
    #[serde(default)]
    pub bound: Option<ObjectId>,
    #[serde(default)]
    pub covariant: bool,
    #[serde(default)]
    pub contravariant: bool,
    #[serde(default)]
    pub infer_variance: bool,
}

impl TypeVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A `TypeVarTuple` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeVarTuple {
    pub name: String,
}

/// A string forward reference inside an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardRef {
    pub arg: String,
}

/// Any other typing construct (parameterized generics, unions, ...),
/// carried by its default textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingForm {
    pub text: String,
}

impl TypingForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueData;

    #[test]
    fn test_enum_detection() {
        let plain = TypeObject::new("m", "Color");
        assert!(!plain.is_enum());

        let e = TypeObject::new("m", "Color").member(ENUM_ENTRIES, ObjectId(0));
        assert!(e.is_enum());
    }

    #[test]
    fn test_full_name() {
        let mut t = TypeObject::new("pkg.ext", "Inner");
        t.qualname = "Outer.Inner".to_string();
        assert_eq!(t.full_name(), "pkg.ext.Outer.Inner");
    }

    #[test]
    fn test_type_parameter_kinds() {
        assert!(Object::TypeVar(TypeVar::new("T")).is_type_parameter());
        assert!(
            Object::TypeVarTuple(TypeVarTuple {
                name: "Ts".to_string()
            })
            .is_type_parameter()
        );
        assert!(!Object::Value(Value::new("builtins", "int", ValueData::Int(1))).is_type_parameter());
    }

    #[test]
    fn test_empty_doc_is_none() {
        let t = Object::Type(TypeObject::new("m", "A").doc(""));
        assert_eq!(t.doc(), None);
    }

    #[test]
    fn test_deserialize_tagged_module() {
        let json = r#"{"kind": "module", "name": "ext", "members": {"f": 1}}"#;
        let obj: Object = serde_json::from_str(json).unwrap();
        let module = obj.as_module().unwrap();
        assert_eq!(module.name, "ext");
        assert_eq!(module.attribute("f"), Some(ObjectId(1)));
    }
}
