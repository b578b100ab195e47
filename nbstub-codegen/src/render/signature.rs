//! Callable signatures.

use nbstub_model::{DefaultArg, Overload, ParamKind, Parameter, Signature};

use super::{ExprRenderer, str_repr};
use crate::{Error, Result};

impl ExprRenderer<'_, '_> {
    /// Render a reflective signature as `(params) -> ret`.
    ///
    /// A `/` follows the last positional-only parameter, and a bare `*`
    /// precedes the first keyword-only parameter unless a `*args` parameter
    /// already separates them.
    pub fn signature(&mut self, sig: &Signature) -> Result<String> {
        let mut params = Vec::with_capacity(sig.parameters.len() + 2);
        let mut posonly_open = false;
        let mut kwonly_sep_needed = true;

        for param in &sig.parameters {
            if param.kind == ParamKind::PositionalOnly {
                posonly_open = true;
            } else if posonly_open {
                params.push("/".to_string());
                posonly_open = false;
            }

            match param.kind {
                ParamKind::VarPositional => kwonly_sep_needed = false,
                ParamKind::KeywordOnly if kwonly_sep_needed => {
                    params.push("*".to_string());
                    kwonly_sep_needed = false;
                }
                _ => {}
            }
            params.push(self.parameter(param)?);
        }
        if posonly_open {
            params.push("/".to_string());
        }

        let mut out = format!("({})", params.join(", "));
        if let Some(ret) = sig.return_annotation {
            out.push_str(" -> ");
            out.push_str(&self.type_name(ret)?);
        }
        Ok(out)
    }

    /// Render one parameter as `name[: annotation][ = default]`.
    pub fn parameter(&mut self, param: &Parameter) -> Result<String> {
        let mut out = match param.kind {
            ParamKind::VarPositional => format!("*{}", param.name),
            ParamKind::VarKeyword => format!("**{}", param.name),
            _ => param.name.clone(),
        };
        if let Some(annotation) = param.annotation {
            out.push_str(": ");
            out.push_str(&self.type_name(annotation)?);
        }
        if let Some(default) = param.default {
            out.push_str(if param.annotation.is_some() { " = " } else { "=" });
            let value = self.expr(default, true)?;
            out.push_str(value.as_deref().unwrap_or("..."));
        }
        Ok(out)
    }

    /// Render the header text of a binding-layer overload.
    ///
    /// An anonymous `def (` receives `name`, type names are canonicalized,
    /// and each default-value marker is replaced in order: `\=N` by a
    /// verbatim string default, `\N` by the rendered default (or `...`).
    pub fn binding_header(&mut self, name: Option<&str>, overload: &Overload) -> Result<String> {
        let mut header = match (overload.template.strip_prefix("def ("), name) {
            (Some(rest), Some(name)) => format!("def {name}({rest}"),
            _ => overload.template.clone(),
        };
        header = self.canonical(&header)?;

        let mut start = 0;
        for (index, arg) in overload.defaults.iter().enumerate() {
            let literal_marker = format!("\\={index}");
            let marker = format!("\\{index}");

            let literal = match arg {
                DefaultArg::Literal(text) => find_from(&header, &literal_marker, start)
                    .map(|pos| (pos, literal_marker.len(), text.clone())),
                DefaultArg::Value(_) => None,
            };
            let (pos, marker_len, text) = match literal {
                Some(found) => found,
                None => {
                    let Some(pos) = find_from(&header, &marker, start) else {
                        return Err(Error::MissingDefaultMarker {
                            index,
                            template: overload.template.clone(),
                        });
                    };
                    let text = match arg {
                        DefaultArg::Value(id) => self.expr(*id, true)?,
                        DefaultArg::Literal(text) => Some(str_repr(text))
                            .filter(|s| s.chars().count() < self.max_expr_length),
                    };
                    (pos, marker.len(), text.unwrap_or_else(|| "...".to_string()))
                }
            };

            if text.contains('\n') {
                return Err(Error::MultilineDefault {
                    index,
                    template: overload.template.clone(),
                });
            }
            header.replace_range(pos..pos + marker_len, &text);
            start = pos + text.len();
        }
        Ok(header)
    }
}

fn find_from(haystack: &str, needle: &str, start: usize) -> Option<usize> {
    haystack
        .get(start..)
        .and_then(|rest| rest.find(needle))
        .map(|pos| pos + start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PythonVersion, generation::ImportResolver, render::Canonicalizer};
    use nbstub_model::{Module, Object, ObjectGraph, ObjectId, TypeObject, Value, ValueData};

    struct Fixture {
        graph: ObjectGraph,
        int: ObjectId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut graph = ObjectGraph::new();
            let int = graph.push(Object::Type(TypeObject::new("builtins", "int")));
            Self { graph, int }
        }

        fn value(&mut self, data: ValueData) -> ObjectId {
            self.graph.push(Object::Value(Value::builtin(data)))
        }

        fn with<T>(mut self, f: impl FnOnce(&mut ExprRenderer<'_, '_>) -> T) -> (T, String) {
            let root = self.graph.push(Object::Module(Module::new("ext")));
            self.graph.set_root(root);
            let canon = Canonicalizer::new("ext", PythonVersion::default()).unwrap();
            let mut imports = ImportResolver::new(&self.graph, "ext");
            let out = f(&mut ExprRenderer::new(&self.graph, &canon, &mut imports, 50));
            (out, imports.render())
        }
    }

    fn param(name: &str, kind: ParamKind) -> Parameter {
        Parameter::new(name, kind)
    }

    #[test]
    fn test_separator_placement() {
        let sig = Signature::new()
            .param(param("a", ParamKind::PositionalOnly))
            .param(param("b", ParamKind::PositionalOnly))
            .param(param("c", ParamKind::PositionalOrKeyword))
            .param(param("d", ParamKind::KeywordOnly));
        let (s, _) = Fixture::new().with(|r| r.signature(&sig).unwrap());
        assert_eq!(s, "(a, b, /, c, *, d)");
    }

    #[test]
    fn test_trailing_positional_only() {
        let sig = Signature::new().param(param("self", ParamKind::PositionalOnly));
        let (s, _) = Fixture::new().with(|r| r.signature(&sig).unwrap());
        assert_eq!(s, "(self, /)");
    }

    #[test]
    fn test_var_positional_replaces_star() {
        let sig = Signature::new()
            .param(param("args", ParamKind::VarPositional))
            .param(param("key", ParamKind::KeywordOnly))
            .param(param("kwargs", ParamKind::VarKeyword));
        let (s, _) = Fixture::new().with(|r| r.signature(&sig).unwrap());
        assert_eq!(s, "(*args, key, **kwargs)");
    }

    #[test]
    fn test_annotations_and_defaults() {
        let mut f = Fixture::new();
        let one = f.value(ValueData::Int(1));
        let opaque = f.value(ValueData::Opaque);
        let sig = Signature::new()
            .param(
                param("x", ParamKind::PositionalOrKeyword)
                    .annotation(f.int)
                    .default_value(one),
            )
            .param(param("y", ParamKind::PositionalOrKeyword).default_value(one))
            .param(param("z", ParamKind::PositionalOrKeyword).default_value(opaque))
            .returns(f.int);
        let (s, imports) = f.with(|r| r.signature(&sig).unwrap());
        assert_eq!(s, "(x: int = 1, y=1, z=...) -> int");
        assert_eq!(imports, "");
    }

    #[test]
    fn test_binding_header_defaults() {
        let mut f = Fixture::new();
        let two = f.value(ValueData::Int(2));
        let overload = Overload::new("def (x: builtins.int = \\0, y: str = \\=1) -> builtins.int")
            .default_arg(DefaultArg::Value(two))
            .default_arg(DefaultArg::Literal("'custom'".to_string()));
        let (s, _) = f.with(|r| r.binding_header(Some("f"), &overload).unwrap());
        assert_eq!(s, "def f(x: int = 2, y: str = 'custom') -> int");
    }

    #[test]
    fn test_string_default_without_literal_marker() {
        let f = Fixture::new();
        let overload = Overload::new("def g(mode: str = \\0) -> None")
            .default_arg(DefaultArg::Literal("fast".to_string()));
        let (s, _) = f.with(|r| r.binding_header(None, &overload).unwrap());
        assert_eq!(s, "def g(mode: str = 'fast') -> None");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let mut f = Fixture::new();
        let marker_like = f.value(ValueData::Str("\\1".to_string()));
        let three = f.value(ValueData::Int(3));
        let overload = Overload::new("def h(a: str = \\0, b: int = \\1) -> None")
            .default_arg(DefaultArg::Value(marker_like))
            .default_arg(DefaultArg::Value(three));
        let (s, _) = f.with(|r| r.binding_header(None, &overload).unwrap());
        assert_eq!(s, "def h(a: str = '\\\\1', b: int = 3) -> None");
    }

    #[test]
    fn test_missing_marker_is_fatal() {
        let mut f = Fixture::new();
        let one = f.value(ValueData::Int(1));
        let overload = Overload::new("def f(x: int) -> None").default_arg(DefaultArg::Value(one));
        let (err, _) = f.with(|r| r.binding_header(None, &overload).unwrap_err());
        assert!(matches!(err, Error::MissingDefaultMarker { index: 0, .. }));
    }

    #[test]
    fn test_multiline_literal_is_fatal() {
        let f = Fixture::new();
        let overload = Overload::new("def f(x: str = \\=0) -> None")
            .default_arg(DefaultArg::Literal("'a'\n'b'".to_string()));
        let (err, _) = f.with(|r| r.binding_header(None, &overload).unwrap_err());
        assert!(matches!(err, Error::MultilineDefault { index: 0, .. }));
    }
}
