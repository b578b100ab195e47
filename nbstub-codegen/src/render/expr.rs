//! Value and type expressions.

use nbstub_model::{Object, ObjectGraph, ObjectId, TypeVar, ValueData};

use super::{Canonicalizer, float_repr, str_repr, strip_variance_markers};
use crate::{Result, generation::ImportResolver};

/// Renders objects of the graph as Python expressions.
///
/// Borrows the generator's import state for the duration of one rendering
/// step, so every name it emits is registered as it is produced.
pub struct ExprRenderer<'a, 'g> {
    pub(crate) graph: &'g ObjectGraph,
    pub(crate) canon: &'a Canonicalizer,
    pub(crate) imports: &'a mut ImportResolver<'g>,
    pub(crate) max_expr_length: usize,
    /// Objects whose expression is being rendered.
    active: Vec<ObjectId>,
}

impl<'a, 'g> ExprRenderer<'a, 'g> {
    pub fn new(
        graph: &'g ObjectGraph,
        canon: &'a Canonicalizer,
        imports: &'a mut ImportResolver<'g>,
        max_expr_length: usize,
    ) -> Self {
        Self {
            graph,
            canon,
            imports,
            max_expr_length,
            active: Vec::new(),
        }
    }

    /// Canonicalize a type or signature string.
    pub fn canonical(&mut self, text: &str) -> Result<String> {
        self.canon.apply(text, self.imports)
    }

    /// An expression that reconstructs the object, or `None` when it has no
    /// faithful source form.
    ///
    /// With `abbreviate` set, strings and containers whose spelling reaches
    /// `max_expr_length` characters are treated as unrepresentable, and so
    /// is an object that contains itself.
    pub fn expr(&mut self, id: ObjectId, abbreviate: bool) -> Result<Option<String>> {
        if self.active.contains(&id) {
            return Ok(None);
        }
        self.active.push(id);
        let result = self.object_expr(id, abbreviate);
        self.active.pop();
        result
    }

    fn object_expr(&mut self, id: ObjectId, abbreviate: bool) -> Result<Option<String>> {
        let graph = self.graph;
        let Some(object) = graph.get(id) else {
            return Ok(None);
        };

        let text = match object {
            Object::Value(value) => return self.value_expr(&value.data, abbreviate),
            Object::EnumMember(member) => {
                let ty = self.type_name(member.enum_type)?;
                format!("{ty}.{}", member.name)
            }
            Object::Type(_) | Object::TypingForm(_) => self.type_name(id)?,
            Object::ForwardRef(r) => format!("\"{}\"", r.arg),
            Object::TypeVarTuple(tv) => {
                let ctor = self.imports.register("typing", Some("TypeVarTuple"), None)?;
                format!("{ctor}(\"{}\")", tv.name)
            }
            Object::TypeVar(tv) => return self.type_var_expr(tv),
            Object::Module(_)
            | Object::Function(_)
            | Object::Property(_)
            | Object::StaticProperty(_) => return Ok(None),
        };
        Ok(Some(text))
    }

    fn value_expr(&mut self, data: &ValueData, abbreviate: bool) -> Result<Option<String>> {
        let text = match data {
            ValueData::None => return Ok(Some("None".to_string())),
            ValueData::Ellipsis => return Ok(Some("Ellipsis".to_string())),
            ValueData::Bool(true) => return Ok(Some("True".to_string())),
            ValueData::Bool(false) => return Ok(Some("False".to_string())),
            ValueData::Int(i) => return Ok(Some(i.to_string())),
            ValueData::Float(f) if f.is_finite() => return Ok(Some(float_repr(*f))),
            ValueData::Float(f) => return Ok(Some(format!("float('{}')", float_repr(*f)))),
            ValueData::Opaque => return Ok(None),
            ValueData::Str(s) => str_repr(s),
            ValueData::List(items) => match self.join(items, abbreviate)? {
                Some(inner) => format!("[{inner}]"),
                None => return Ok(None),
            },
            ValueData::Tuple(items) => match self.join(items, abbreviate)? {
                Some(inner) if items.len() == 1 => format!("({inner},)"),
                Some(inner) => format!("({inner})"),
                None => return Ok(None),
            },
            ValueData::Dict(entries) => {
                let mut parts = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let (Some(k), Some(v)) = (self.expr(*k, abbreviate)?, self.expr(*v, abbreviate)?)
                    else {
                        return Ok(None);
                    };
                    parts.push(format!("{k}: {v}"));
                }
                format!("{{{}}}", parts.join(", "))
            }
        };

        if abbreviate && text.chars().count() >= self.max_expr_length {
            return Ok(None);
        }
        Ok(Some(text))
    }

    fn join(&mut self, items: &[ObjectId], abbreviate: bool) -> Result<Option<String>> {
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            match self.expr(*item, abbreviate)? {
                Some(part) => parts.push(part),
                None => return Ok(None),
            }
        }
        Ok(Some(parts.join(", ")))
    }

    fn type_var_expr(&mut self, tv: &TypeVar) -> Result<Option<String>> {
        let ctor = self.imports.register("typing", Some("TypeVar"), None)?;
        let mut text = format!("{ctor}(\"{}\"", tv.name);
        for constraint in &tv.constraints {
            let Some(c) = self.expr(*constraint, true)? else {
                return Ok(None);
            };
            text.push_str(&format!(", {c}"));
        }
        if tv.contravariant {
            text.push_str(", contravariant=True");
        }
        if tv.covariant {
            text.push_str(", covariant=True");
        }
        if let Some(bound) = tv.bound {
            let Some(b) = self.expr(bound, true)? else {
                return Ok(None);
            };
            text.push_str(&format!(", bound={b}"));
        }
        if tv.infer_variance {
            text.push_str(", infer_variance=True");
        }
        text.push(')');
        Ok(Some(text))
    }

    /// The canonical spelling of a type or annotation.
    pub fn type_name(&mut self, id: ObjectId) -> Result<String> {
        let graph = self.graph;
        let raw = match graph.get(id) {
            Some(Object::TypeVar(tv)) => tv.name.clone(),
            Some(Object::Type(t)) => t.full_name(),
            Some(Object::TypingForm(form)) => strip_variance_markers(&form.text),
            Some(Object::ForwardRef(r)) => format!("\"{}\"", r.arg),
            Some(Object::Value(_)) => match self.expr(id, false)? {
                Some(text) => text,
                None => return Ok("...".to_string()),
            },
            _ => return Ok("...".to_string()),
        };
        self.canonical(&raw)
    }

    /// The canonical spelling of a type given as `module.qualname`.
    pub fn qualified_name(&mut self, full_name: &str) -> Result<String> {
        self.canonical(full_name)
    }
}
