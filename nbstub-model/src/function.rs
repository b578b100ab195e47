//! Callable objects and their signature metadata.

use serde::{Deserialize, Serialize};

use crate::ObjectId;

/// A function, method or static/class method wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// The function's own `__name__`.
    pub name: String,
    /// Defining module, when known.
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub kind: FunctionKind,
    pub callable: Callable,
}

impl Function {
    /// A binding-layer function with the given signature descriptors.
    pub fn binding(name: impl Into<String>, overloads: Vec<Overload>) -> Self {
        Self {
            name: name.into(),
            module: None,
            doc: None,
            kind: FunctionKind::Function,
            callable: Callable::Binding { overloads },
        }
    }

    /// An ordinary function with a reflective signature.
    pub fn reflected(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            module: None,
            doc: None,
            kind: FunctionKind::Function,
            callable: Callable::Reflected {
                signature,
                overloads: Vec::new(),
            },
        }
    }

    /// Set the defining module.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Set the docstring.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the function kind.
    pub fn kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn references(&self) -> Vec<ObjectId> {
        match &self.callable {
            Callable::Binding { overloads } => overloads
                .iter()
                .flat_map(|o| o.defaults.iter())
                .filter_map(|d| match d {
                    DefaultArg::Value(id) => Some(*id),
                    DefaultArg::Literal(_) => None,
                })
                .collect(),
            Callable::Reflected {
                signature,
                overloads,
            } => std::iter::once(signature)
                .chain(overloads.iter().map(|o| &o.signature))
                .flat_map(Signature::references)
                .collect(),
        }
    }
}

/// How a callable is bound to its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// A free function (or a binding-layer function object).
    #[default]
    Function,
    /// Wrapped in `staticmethod`.
    StaticMethod,
    /// Wrapped in `classmethod`.
    ClassMethod,
    /// A binding-layer method descriptor.
    Method,
}

/// The signature metadata a callable carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Callable {
    /// Compact descriptors produced by the binding layer, one per overload.
    Binding { overloads: Vec<Overload> },
    /// A standard reflective signature plus any declared `@overload`s.
    Reflected {
        signature: Signature,
        #[serde(default)]
        overloads: Vec<ReflectedOverload>,
    },
}

/// One binding-layer signature descriptor.
///
/// `template` is declaration text such as `def f(x: int = \0) -> int` where
/// `\N` marks the position of the N-th default value and `\=N` marks a
/// position where a string default is spliced in as source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overload {
    pub template: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub defaults: Vec<DefaultArg>,
}

impl Overload {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            doc: None,
            defaults: Vec::new(),
        }
    }

    /// Set the docstring.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Append a default-value descriptor.
    pub fn default_arg(mut self, arg: DefaultArg) -> Self {
        self.defaults.push(arg);
        self
    }
}

/// A default-value descriptor of a binding-layer overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultArg {
    /// A runtime value to render.
    Value(ObjectId),
    /// A string default. Spliced verbatim where the template carries a
    /// `\=N` marker, rendered as a string literal otherwise.
    Literal(String),
}

/// An explicitly declared overload of an ordinary function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectedOverload {
    pub signature: Signature,
    #[serde(default)]
    pub doc: Option<String>,
}

/// A reflective signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_annotation: Option<ObjectId>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Set the return annotation.
    pub fn returns(mut self, annotation: ObjectId) -> Self {
        self.return_annotation = Some(annotation);
        self
    }

    fn references(&self) -> Vec<ObjectId> {
        self.parameters
            .iter()
            .flat_map(|p| p.annotation.into_iter().chain(p.default))
            .chain(self.return_annotation)
            .collect()
    }
}

/// Parameter binding kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    #[default]
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

/// One parameter of a reflective signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub kind: ParamKind,
    #[serde(default)]
    pub annotation: Option<ObjectId>,
    #[serde(default)]
    pub default: Option<ObjectId>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation: None,
            default: None,
        }
    }

    /// Set the annotation.
    pub fn annotation(mut self, id: ObjectId) -> Self {
        self.annotation = Some(id);
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, id: ObjectId) -> Self {
        self.default = Some(id);
        self
    }
}
