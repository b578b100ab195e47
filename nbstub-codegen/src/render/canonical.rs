//! Canonical spelling of type expressions.
//!
//! Runtime type names come out fully qualified (`builtins.int`,
//! `ext.Point`, `numpy.ndarray[dtype=float32]`). The rewrite pass turns
//! them into the spelling a type checker expects and registers every import
//! the rewritten text relies on.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use crate::{PythonVersion, Result, generation::ImportResolver};

static NONE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbuiltins\.NoneType\b").expect("valid regex"));

static BUILTIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbuiltins\.([^\d\W]\w*)").expect("valid regex"));

static TYPING_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(Union|Optional|Tuple|Dict|List|Annotated|Callable|Sequence|Mapping|Set|Iterator|Iterable)\b",
    )
    .expect("valid regex")
});

static TYPES_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(ModuleType|CapsuleType|EllipsisType)\b").expect("valid regex")
});

static NDARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(numpy\.ndarray|ndarray|torch\.Tensor)\[([^\]]*)\]").expect("valid regex")
});

static DTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"dtype=(\w*)\b").expect("valid regex"));

static IDENTIFIER_SEQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:[^\d\W]\w*\.)+)([^\d\W]\w*)\b").expect("valid regex")
});

/// Generic aliases taken from `typing` when subscripted.
const TYPING_GENERICS: &[&str] = &["Union", "Optional", "Tuple", "Dict", "List", "Annotated"];

/// Abstract collections, from `collections.abc` or `typing` depending on
/// the target Python version.
const ABC_NAMES: &[&str] = &[
    "Callable", "Tuple", "Sequence", "Mapping", "Set", "Iterator", "Iterable",
];

/// Rewrites type expressions for one target module.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    local: Regex,
    abc_module: &'static str,
}

impl Canonicalizer {
    /// Create a canonicalizer for stubs of `module`.
    pub fn new(module: &str, python_version: PythonVersion) -> Result<Self> {
        let local = Regex::new(&format!(r"\b{}\.([^\d\W]\w*)", regex::escape(module)))?;
        Ok(Self {
            local,
            abc_module: python_version.abc_module(),
        })
    }

    /// Rewrite `text`, registering the imports it needs.
    pub fn apply(&self, text: &str, imports: &mut ImportResolver<'_>) -> Result<String> {
        // Members of the target module are referenced unqualified.
        let s = rewrite(&self.local, text, |caps, _| Ok(Some(caps[1].to_string())))?;
        let is_local = s != text;

        let s = rewrite(&NONE_TYPE, &s, |_, _| Ok(Some("None".to_string())))?;
        let s = rewrite(&BUILTIN, &s, |caps, _| Ok(Some(caps[1].to_string())))?;
        let s = s.replace("tuple[]", "tuple[()]").replace("Tuple[]", "Tuple[()]");

        let s = rewrite(&TYPING_NAME, &s, |caps, rest| {
            let name = &caps[1];
            let source = if rest.starts_with('[') && TYPING_GENERICS.contains(&name) {
                "typing"
            } else if ABC_NAMES.contains(&name) {
                self.abc_module
            } else {
                return Ok(Some(name.to_string()));
            };
            imports.register(source, Some(name), None).map(Some)
        })?;

        let s = rewrite(&TYPES_NAME, &s, |caps, _| {
            imports.register("types", Some(&caps[1]), None).map(Some)
        })?;

        let s = rewrite(&NDARRAY, &s, |caps, _| {
            let array_like = imports.register("numpy.typing", Some("ArrayLike"), None)?;
            let inner = DTYPE.replace_all(&caps[2], "dtype='$1'").replace('*', "None");
            if inner.is_empty() {
                return Ok(Some(array_like));
            }
            let annotated = imports.register("typing", Some("Annotated"), None)?;
            Ok(Some(format!("{annotated}[{array_like}, dict({inner})]")))
        })?;

        // Qualified names stay inline; their modules still need importing.
        let s = if is_local {
            s
        } else {
            rewrite(&IDENTIFIER_SEQ, &s, |caps, rest| {
                if rest.starts_with('.') {
                    return Ok(None);
                }
                let module = caps[1].trim_end_matches('.');
                imports.register(module, None, None)?;
                Ok(Some(caps[0].to_string()))
            })?
        };

        trace!(from = text, to = %s, "canonicalized");
        Ok(s)
    }
}

/// Remove `~` and `-` variance markers that follow a space or `[`.
pub fn strip_variance_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        let marker = matches!(c, '~' | '-') && matches!(prev, Some(' ' | '['));
        if !marker {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Whether a match starting at `start` is not glued to a preceding
/// identifier, attribute access or escape.
fn separated_before(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !(c == '.' || c == '\\' || c == '_' || c.is_alphanumeric()))
}

fn next_char(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

/// Replace every separated match of `re` in `text` with what `replace`
/// returns for it.
///
/// `replace` receives the captures and the text following the match; it
/// returns `None` to reject the match, in which case scanning resumes one
/// character after the match start.
fn rewrite<F>(re: &Regex, text: &str, mut replace: F) -> Result<String>
where
    F: FnMut(&Captures<'_>, &str) -> Result<Option<String>>,
{
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;
    while pos <= text.len() {
        let Some(caps) = re.captures_at(text, pos) else {
            break;
        };
        let Some(m) = caps.get(0) else {
            break;
        };
        let replacement = if separated_before(text, m.start()) {
            replace(&caps, &text[m.end()..])?
        } else {
            None
        };
        match replacement {
            Some(r) => {
                out.push_str(&text[copied..m.start()]);
                out.push_str(&r);
                copied = m.end();
                pos = if m.is_empty() {
                    next_char(text, m.end())
                } else {
                    m.end()
                };
            }
            None => pos = next_char(text, m.start()),
        }
    }
    out.push_str(&text[copied..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbstub_model::{Module, Object, ObjectGraph};

    fn graph() -> ObjectGraph {
        let mut graph = ObjectGraph::new();
        let root = graph.push(Object::Module(Module::new("ext")));
        graph.set_root(root);
        graph
    }

    fn canon(text: &str, version: PythonVersion) -> (String, String) {
        let graph = graph();
        let mut imports = ImportResolver::new(&graph, "ext");
        let out = Canonicalizer::new("ext", version)
            .unwrap()
            .apply(text, &mut imports)
            .unwrap();
        (out, imports.render())
    }

    fn py39(text: &str) -> (String, String) {
        canon(text, PythonVersion::new(3, 9))
    }

    #[test]
    fn test_builtins_and_local_names() {
        let (s, imports) = py39("def f(x: builtins.int, p: ext.Point) -> builtins.NoneType");
        assert_eq!(s, "def f(x: int, p: Point) -> None");
        assert_eq!(imports, "");
    }

    #[test]
    fn test_nested_local_name() {
        let (s, imports) = py39("ext.Outer.Inner");
        assert_eq!(s, "Outer.Inner");
        assert_eq!(imports, "");
    }

    #[test]
    fn test_foreign_module_prefix_untouched() {
        let (s, imports) = py39("other.ext.Point");
        assert_eq!(s, "other.ext.Point");
        assert_eq!(imports, "import other.ext\n");
    }

    #[test]
    fn test_empty_tuple() {
        assert_eq!(py39("tuple[]").0, "tuple[()]");
    }

    #[test]
    fn test_typing_generics_and_abc() {
        let (s, imports) =
            py39("def f(a: Optional[int], b: Sequence[str], c: Tuple[int, int]) -> Callable");
        assert_eq!(
            s,
            "def f(a: Optional[int], b: Sequence[str], c: Tuple[int, int]) -> Callable"
        );
        assert_eq!(
            imports,
            "from collections.abc import Sequence, Callable\nfrom typing import Optional, Tuple\n"
        );
    }

    #[test]
    fn test_bare_tuple_is_abstract_collection() {
        let (_, imports) = canon("Tuple", PythonVersion::new(3, 9));
        assert_eq!(imports, "from collections.abc import Tuple\n");
    }

    #[test]
    fn test_abc_source_for_old_python() {
        let (_, imports) = canon("Sequence[int]", PythonVersion::new(3, 8));
        assert_eq!(imports, "from typing import Sequence\n");
    }

    #[test]
    fn test_names_inside_identifiers_untouched() {
        let (s, imports) = py39("MyOptional[int] | typing.Optional[int]");
        assert_eq!(s, "MyOptional[int] | typing.Optional[int]");
        assert_eq!(imports, "import typing\n");
    }

    #[test]
    fn test_runtime_types() {
        let (s, imports) = py39("def f(m: ModuleType) -> CapsuleType");
        assert_eq!(s, "def f(m: ModuleType) -> CapsuleType");
        assert_eq!(imports, "from types import ModuleType, CapsuleType\n");
    }

    #[test]
    fn test_ndarray_with_descriptor() {
        let (s, imports) = py39("numpy.ndarray[dtype=float32, shape=(*, 3)]");
        assert_eq!(
            s,
            "Annotated[ArrayLike, dict(dtype='float32', shape=(None, 3))]"
        );
        assert_eq!(
            imports,
            "from numpy.typing import ArrayLike\nfrom typing import Annotated\n"
        );
    }

    #[test]
    fn test_ndarray_without_descriptor() {
        let (s, imports) = py39("def f(a: ndarray[]) -> None");
        assert_eq!(s, "def f(a: ArrayLike) -> None");
        assert_eq!(imports, "from numpy.typing import ArrayLike\n");
    }

    #[test]
    fn test_qualified_names_import_their_module() {
        let (s, imports) = py39("def f(x: numpy.float32, y: os.path.PathLike) -> None");
        assert_eq!(s, "def f(x: numpy.float32, y: os.path.PathLike) -> None");
        assert_eq!(imports, "import numpy\nimport os.path\n");
    }

    #[test]
    fn test_variance_markers() {
        assert_eq!(strip_variance_markers("list[~T]"), "list[T]");
        assert_eq!(strip_variance_markers("Callable[[-T], +U]"), "Callable[[T], +U]");
        assert_eq!(strip_variance_markers("dict[str, ~V]"), "dict[str, V]");
        assert_eq!(strip_variance_markers("~T"), "~T");
    }
}
