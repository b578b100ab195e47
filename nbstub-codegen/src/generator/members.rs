//! Declaration emitters for each kind of entity.

use indexmap::IndexMap;
use nbstub_model::{
    Callable, Function, FunctionKind, Object, ObjectId, Overload, Property, ReflectedOverload,
    Signature, StaticProperty, TypeObject,
};
use tracing::debug;

use super::StubGen;
use crate::{
    Result,
    generation::{is_arithmetic, strip_enum_members},
};

/// Separates the parameter list from the return type in a getter template.
const GETTER_RETURN_MARKER: &str = "/) -> ";

fn non_empty(doc: Option<&str>) -> Option<&str> {
    doc.filter(|d| !d.is_empty())
}

impl StubGen<'_> {
    fn docstring_enabled<'d>(&self, doc: Option<&'d str>) -> Option<&'d str> {
        non_empty(doc).filter(|_| self.config.include_docstrings)
    }

    /// A free function, static method or class method.
    pub(super) fn put_function(
        &mut self,
        f: &Function,
        name: Option<&str>,
        parent: Option<ObjectId>,
    ) -> Result<()> {
        let graph = self.graph;
        if name == Some("__init__") {
            let binding_parent = parent
                .and_then(|p| graph.get(p))
                .and_then(Object::as_type)
                .is_some_and(|t| t.binding);
            if binding_parent {
                return Ok(());
            }
        }

        if let Some(fn_module) = f.module.as_deref() {
            if fn_module != self.target.name {
                self.imports.register(fn_module, Some(&f.name), name)?;
                return Ok(());
            }
        }
        if let Some(name) = name {
            if !f.name.is_empty() && name != f.name {
                self.out.write_ln(&format!("{name} = {}", f.name));
                self.out.write_ln("");
                return Ok(());
            }
        }

        let decorator = match f.kind {
            FunctionKind::StaticMethod => Some("staticmethod"),
            FunctionKind::ClassMethod => Some("classmethod"),
            FunctionKind::Function | FunctionKind::Method => None,
        };

        match &f.callable {
            Callable::Binding { overloads } => {
                self.put_binding_function(f, overloads, name, decorator)
            }
            Callable::Reflected {
                signature,
                overloads,
            } => self.put_reflected_function(f, signature, overloads, name, decorator),
        }
    }

    /// A binding-layer function, one declaration per overload.
    ///
    /// `decorator` is repeated on every overload.
    pub(super) fn put_binding_function(
        &mut self,
        f: &Function,
        overloads: &[Overload],
        name: Option<&str>,
        decorator: Option<&str>,
    ) -> Result<()> {
        let name = name.or(Some(f.name.as_str()).filter(|n| !n.is_empty()));
        if let [overload] = overloads {
            return self.put_binding_overload(f, overload, name, decorator);
        }

        for overload in overloads {
            let overload_decorator = self.imports.register("typing", Some("overload"), None)?;
            self.out.write_ln(&format!("@{overload_decorator}"));
            self.put_binding_overload(f, overload, name, decorator)?;
        }
        Ok(())
    }

    fn put_binding_overload(
        &mut self,
        f: &Function,
        overload: &Overload,
        name: Option<&str>,
        decorator: Option<&str>,
    ) -> Result<()> {
        let header = self.renderer().binding_header(name, overload)?;

        let nested_function = f.kind == FunctionKind::Function && self.out.depth() > 0;
        let decorator = decorator.or(nested_function.then_some("staticmethod"));
        if let Some(decorator) = decorator {
            self.out.write_ln(&format!("@{decorator}"));
        }
        for line in header.split('\n') {
            self.out.write_ln(line);
        }

        match self.docstring_enabled(overload.doc.as_deref()) {
            None => {
                self.out.close_line(": ...");
            }
            Some(doc) => {
                self.out.close_line(":");
                self.out.indented(|out| {
                    out.put_docstring(doc);
                });
            }
        }
        self.out.write("\n");
        Ok(())
    }

    /// A function described by a reflective signature and its declared
    /// overloads. The first overload inherits the implementation's docstring
    /// when it has none of its own.
    fn put_reflected_function(
        &mut self,
        f: &Function,
        signature: &Signature,
        overloads: &[ReflectedOverload],
        name: Option<&str>,
        decorator: Option<&str>,
    ) -> Result<()> {
        let name = name.unwrap_or(&f.name);
        let shapes: Vec<(&Signature, Option<&str>)> = if overloads.is_empty() {
            vec![(signature, f.doc.as_deref())]
        } else {
            overloads
                .iter()
                .map(|o| (&o.signature, o.doc.as_deref()))
                .collect()
        };
        let decorate = shapes.len() > 1;

        for (i, (sig, doc)) in shapes.into_iter().enumerate() {
            if decorate {
                let overload_decorator = self.imports.register("typing", Some("overload"), None)?;
                self.out.write_ln(&format!("@{overload_decorator}"));
            }
            if let Some(decorator) = decorator {
                self.out.write_ln(&format!("@{decorator}"));
            }
            let declaration = format!("def {name}{}", self.renderer().signature(sig)?);

            let mut doc = non_empty(doc);
            if i == 0 && doc.is_none() {
                doc = non_empty(f.doc.as_deref());
            }
            match self.docstring_enabled(doc) {
                None => {
                    self.out.write_ln(&format!("{declaration}: ..."));
                }
                Some(doc) => {
                    self.out.write_ln(&format!("{declaration}:"));
                    self.out.indented(|out| {
                        out.put_docstring(doc);
                    });
                }
            }
            self.out.write("\n");
        }
        Ok(())
    }

    /// A `property`, as an `@property` getter and an optional setter.
    ///
    /// The setter's docstring is dropped when it repeats the getter's.
    pub(super) fn put_property(&mut self, prop: &Property, name: Option<&str>) -> Result<()> {
        let Some(name) = name else {
            return Ok(());
        };

        self.out.write_ln("@property");
        self.put_accessor(prop.getter, name)?;

        let Some(setter) = prop.setter else {
            return Ok(());
        };
        self.out.write_ln(&format!("@{name}.setter"));

        let saved = self.config.include_docstrings;
        if self.same_binding_docs(prop.getter, setter) {
            self.config.include_docstrings = false;
        }
        let result = self.put_accessor(setter, name);
        self.config.include_docstrings = saved;
        result
    }

    fn put_accessor(&mut self, id: ObjectId, name: &str) -> Result<()> {
        let graph = self.graph;
        match graph.get(id) {
            Some(Object::Function(f)) => match (&f.kind, &f.callable) {
                (FunctionKind::Method, Callable::Binding { overloads }) => {
                    self.put_binding_function(f, overloads, Some(name), None)
                }
                _ => self.put_function(f, Some(name), None),
            },
            _ => Ok(()),
        }
    }

    fn same_binding_docs(&self, getter: ObjectId, setter: ObjectId) -> bool {
        let first_doc = |id: ObjectId| match self.graph.get(id) {
            Some(Object::Function(Function {
                callable: Callable::Binding { overloads },
                ..
            })) => non_empty(overloads.first().and_then(|o| o.doc.as_deref())),
            _ => None,
        };
        match (first_doc(getter), first_doc(setter)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// A class-level property of a binding type, declared as an annotated
    /// attribute typed by its getter's return type.
    pub(super) fn put_static_property(
        &mut self,
        prop: &StaticProperty,
        name: Option<&str>,
    ) -> Result<()> {
        let Some(name) = name else {
            return Ok(());
        };

        let graph = self.graph;
        let ty = match graph.get(prop.getter) {
            Some(Object::Function(f)) => match &f.callable {
                Callable::Binding { overloads } => match overloads
                    .first()
                    .and_then(|o| o.template.split_once(GETTER_RETURN_MARKER))
                {
                    Some((_, ret)) => Some(self.renderer().canonical(ret)?),
                    None => None,
                },
                Callable::Reflected { signature, .. } => match signature.return_annotation {
                    Some(ret) => Some(self.renderer().type_name(ret)?),
                    None => None,
                },
            },
            _ => None,
        };
        let ty = ty.unwrap_or_else(|| "object".to_string());

        self.out.write_ln(&format!("{name}: {ty} = ..."));
        if let Some(doc) = self.docstring_enabled(prop.doc.as_deref()) {
            self.out.put_docstring(doc);
        }
        self.out.write("\n");
        Ok(())
    }

    /// A class declaration, or an alias when the type is reached under a
    /// different name or from another module.
    pub(super) fn put_type(
        &mut self,
        id: ObjectId,
        t: &TypeObject,
        module: Option<&str>,
        name: Option<&str>,
    ) -> Result<()> {
        let target = self.target;
        let module = module.unwrap_or(&target.name);

        if let Some(name) = name {
            if name != t.name || module != t.module {
                if module == t.module {
                    let alias = self.imports.register("typing", Some("TypeAlias"), None)?;
                    self.out.write_ln(&format!("{name}: {alias} = {}", t.name));
                    self.out.write_ln("");
                } else {
                    self.imports.register(&t.module, Some(&t.name), Some(name))?;
                }
                return Ok(());
            }
        }

        let mut members = t.members.clone();
        let mut doc = t.doc.as_deref();
        let mut bases = None;
        if t.is_enum() {
            doc = t.inner_doc.as_deref();
            let arithmetic = is_arithmetic(&members);
            strip_enum_members(&mut members);
            bases = Some(vec![self.enums.record(arithmetic).to_string()]);
            debug!(name = %t.name, arithmetic, "compacting enumeration");
        }

        if let Some(signature) = &t.signature {
            for line in signature.split('\n') {
                let line = self.renderer().canonical(line)?;
                self.out.write_ln(&line);
            }
            self.out.close_line(":");
        } else {
            let bases = match bases {
                Some(bases) => bases,
                None => {
                    let ids = t.orig_bases.as_ref().unwrap_or(&t.bases);
                    let mut names = Vec::with_capacity(ids.len());
                    for base in ids {
                        names.push(self.renderer().type_name(*base)?);
                    }
                    names
                }
            };
            if bases.is_empty() || bases == ["object"] {
                self.out.write_ln(&format!("class {}:", t.name));
            } else {
                self.out
                    .write_ln(&format!("class {}({}):", t.name, bases.join(", ")));
            }
        }

        self.out.push_indent();
        let body_start = self.out.len();
        let result = self.put_class_body(id, &members, doc, module);
        if result.is_ok() && self.out.len() == body_start {
            self.out.write_ln("pass");
            self.out.write_ln("");
        }
        self.out.push_dedent();
        result
    }

    fn put_class_body(
        &mut self,
        id: ObjectId,
        members: &IndexMap<String, ObjectId>,
        doc: Option<&str>,
        module: &str,
    ) -> Result<()> {
        if let Some(doc) = self.docstring_enabled(doc) {
            self.out.put_docstring(doc);
            if !members.is_empty() {
                self.out.write("\n");
            }
        }
        for (member_name, member) in members {
            self.visit(*member, Some(module), Some(member_name.as_str()), Some(id))?;
        }
        Ok(())
    }

    /// Any other attribute: an enumeration entry, a type parameter, a type
    /// alias, or an annotated value.
    pub(super) fn put_value(
        &mut self,
        id: ObjectId,
        object: &Object,
        name: Option<&str>,
        parent: Option<ObjectId>,
        abbreviate: bool,
    ) -> Result<()> {
        let Some(name) = name else {
            return Ok(());
        };

        match object {
            Object::EnumMember(member) if self.is_entry_of(member.enum_type, parent) => {
                let ty = self.renderer().type_name(member.enum_type)?;
                self.out.write_ln(&format!("{name}: {ty}"));
                if let Some(doc) = self.docstring_enabled(member.doc.as_deref()) {
                    self.out.put_docstring(doc);
                }
                self.out.write("\n");
            }
            Object::TypeVar(_) | Object::TypeVarTuple(_) => {
                let expr = self.renderer().expr(id, abbreviate)?;
                let expr = expr.as_deref().unwrap_or("...");
                self.out.write_ln(&format!("{name} = {expr}"));
                self.out.write_ln("");
            }
            Object::TypingForm(_) => {
                let alias = self.imports.register("typing", Some("TypeAlias"), None)?;
                let ty = self.renderer().type_name(id)?;
                self.out.write_ln(&format!("{name}: {alias} = {ty}"));
                self.out.write_ln("");
            }
            _ => {
                let expr = self.renderer().expr(id, abbreviate)?;
                let expr = expr.as_deref().unwrap_or("...");
                let ty = match object {
                    Object::Value(value) => self.renderer().qualified_name(&value.ty.full_name())?,
                    Object::EnumMember(member) => self.renderer().type_name(member.enum_type)?,
                    Object::ForwardRef(_) => self.renderer().qualified_name("typing.ForwardRef")?,
                    _ => "object".to_string(),
                };
                self.out.write_ln(&format!("{name}: {ty} = {expr}"));
                self.out.write_ln("");
            }
        }
        Ok(())
    }

    fn is_entry_of(&self, enum_type: ObjectId, parent: Option<ObjectId>) -> bool {
        parent == Some(enum_type)
            && self
                .graph
                .get(enum_type)
                .and_then(Object::as_type)
                .is_some_and(TypeObject::is_enum)
    }
}
