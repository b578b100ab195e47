//! Traversal of the object graph.

use nbstub_model::{Callable, ENUM_ENTRIES, FunctionKind, Object, ObjectId};
use nbstub_rules::TemplateLine;
use tracing::{debug, trace};

use super::StubGen;
use crate::Result;

/// Attributes present on every class or module that never belong in a stub.
pub(crate) const IGNORED_NAMES: &[&str] = &[
    "__doc__",
    "__module__",
    "__name__",
    "__new__",
    "__builtins__",
    "__cached__",
    "__path__",
    "__version__",
    "__spec__",
    "__loader__",
    "__package__",
    "__nb_signature__",
    "__class_getitem__",
    "__orig_bases__",
    "__file__",
    "__dict__",
    "__weakref__",
    ENUM_ENTRIES,
];

/// Names with a single leading underscore, or a single trailing one.
pub(crate) fn is_private(name: &str) -> bool {
    name.chars().count() > 2
        && ((name.starts_with('_') && !name.starts_with("__"))
            || (name.ends_with('_') && !name.ends_with("__")))
}

impl StubGen<'_> {
    /// Visit one object reached as `name` inside `module`.
    ///
    /// Objects already on the visit stack are skipped, which breaks
    /// reference cycles. The dotted prefix is extended for the duration of
    /// the visit and restored afterwards, whatever the outcome.
    pub(crate) fn visit(
        &mut self,
        id: ObjectId,
        module: Option<&str>,
        name: Option<&str>,
        parent: Option<ObjectId>,
    ) -> Result<()> {
        if self.stack.contains(&id) {
            trace!(?id, "skipping object already being visited");
            return Ok(());
        }

        self.stack.push(id);
        let prefix_len = self.prefix.len();
        if let Some(name) = name {
            if !self.prefix.is_empty() {
                self.prefix.push('.');
            }
            self.prefix.push_str(name);
        }

        let result = self.visit_object(id, module, name, parent);

        self.prefix.truncate(prefix_len);
        self.stack.pop();
        result
    }

    fn visit_object(
        &mut self,
        id: ObjectId,
        module: Option<&str>,
        name: Option<&str>,
        parent: Option<ObjectId>,
    ) -> Result<()> {
        let graph = self.graph;
        let Some(object) = graph.get(id) else {
            return Ok(());
        };

        if !self.prefix.is_empty() && self.apply_rule(object)? {
            return Ok(());
        }

        if let Some(name) = name {
            if IGNORED_NAMES.contains(&name) {
                return Ok(());
            }
            if !self.config.include_private && !object.is_type_parameter() && is_private(name) {
                trace!(path = %self.prefix, "skipping private name");
                return Ok(());
            }
        }

        debug!(path = %self.prefix, kind = object.kind_name(), "emitting");
        match object {
            Object::Module(m) if self.stack.len() != 1 => {
                self.imports.register(&m.name, None, name)?;
            }
            Object::Module(m) => {
                let mut members: Vec<_> = m.members.iter().collect();
                members.sort_by(|a, b| a.0.cmp(b.0));
                for (child_name, child) in members {
                    self.visit(*child, Some(m.name.as_str()), Some(child_name.as_str()), Some(id))?;
                }
            }
            Object::Function(f) => match (&f.kind, &f.callable) {
                (FunctionKind::Method, Callable::Binding { overloads }) => {
                    self.put_binding_function(f, overloads, name, None)?;
                }
                _ => self.put_function(f, name, parent)?,
            },
            Object::Type(t) => self.put_type(id, t, module, name)?,
            Object::Property(p) => self.put_property(p, name)?,
            Object::StaticProperty(p) => self.put_static_property(p, name)?,
            _ => self.put_value(id, object, name, parent, name != Some("__all__"))?,
        }
        Ok(())
    }

    /// Emit the template of the first rule matching the current prefix.
    ///
    /// Returns whether a rule matched; a matching rule with an empty
    /// template deletes the entity.
    fn apply_rule(&mut self, object: &Object) -> Result<bool> {
        let Some(expansion) = self.rules.find(&self.prefix) else {
            return Ok(false);
        };

        for line in expansion.lines {
            match line {
                TemplateLine::Text(text) => {
                    self.out.write_ln(&text);
                }
                TemplateLine::Doc => {
                    let doc = object.doc().filter(|_| self.config.include_docstrings);
                    self.out.indented(|out| {
                        match doc {
                            Some(doc) => out.put_docstring(doc),
                            None => out.write_ln("pass"),
                        };
                    });
                }
                TemplateLine::Import(specs) => {
                    for spec in specs {
                        self.imports
                            .register(&spec.module, Some(&spec.name), spec.alias.as_deref())?;
                    }
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_names() {
        assert!(is_private("_helper"));
        assert!(is_private("value_"));
        assert!(!is_private("__init__"));
        assert!(!is_private("__x"));
        assert!(!is_private("public"));
        assert!(!is_private("_"));
        assert!(!is_private("__"));
        assert!(!is_private("_a"));
    }
}
