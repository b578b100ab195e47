//! Import requirement tracking and alias resolution.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use nbstub_model::{Module, ObjectGraph};
use tracing::debug;

use crate::{Error, Result};

/// Underscore-prefixing attempts before giving up on a colliding name.
pub const MAX_ALIAS_ATTEMPTS: usize = 64;

/// Longest single-line `from ... import ...` statement, newline included.
const IMPORT_LINE_WIDTH: usize = 70;

/// `(original name, requested alias)`; a `None` name imports the module itself.
type ImportKey = (Option<String>, Option<String>);

/// Tracks the imports a stub needs and the local name each one is bound to.
///
/// Imports are keyed by source module and `(name, alias)`; registering the
/// same request twice returns the alias resolved the first time. When no
/// alias is requested, a name that would shadow an unrelated attribute of the
/// target module is prefixed with underscores until it no longer collides.
///
/// # Example
///
/// ```
/// use nbstub_codegen::generation::ImportResolver;
/// use nbstub_model::{Module, Object, ObjectGraph};
///
/// let mut graph = ObjectGraph::new();
/// let root = graph.push(Object::Module(Module::new("ext")));
/// graph.set_root(root);
///
/// let mut imports = ImportResolver::new(&graph, "ext");
/// assert_eq!(imports.register("typing", Some("Optional"), None).unwrap(), "Optional");
/// assert_eq!(imports.register("builtins", Some("int"), None).unwrap(), "int");
/// assert_eq!(imports.render(), "from typing import Optional\n");
/// ```
#[derive(Debug, Clone)]
pub struct ImportResolver<'g> {
    graph: &'g ObjectGraph,
    module: String,
    target: Option<&'g Module>,
    imports: BTreeMap<String, IndexMap<ImportKey, String>>,
}

impl<'g> ImportResolver<'g> {
    /// Create a resolver for a stub of `module`.
    pub fn new(graph: &'g ObjectGraph, module: impl Into<String>) -> Self {
        let module = module.into();
        let target = graph.find_module(&module).map(|(_, m)| m);
        Self {
            graph,
            module,
            target,
            imports: BTreeMap::new(),
        }
    }

    /// Request `name` from `module` (or `module` itself when `name` is
    /// `None`), optionally bound to `alias`, and return the local name.
    pub fn register(
        &mut self,
        module: &str,
        name: Option<&str>,
        alias: Option<&str>,
    ) -> Result<String> {
        if module == "builtins" && (alias.is_none() || name == alias) {
            return Ok(name.unwrap_or(module).to_string());
        }

        let mut name = name.map(str::to_string);
        let alias = alias.map(str::to_string);
        let short = match module.strip_prefix(self.module.as_str()) {
            // A name from the target module itself needs no import.
            Some("") => {
                if let Some(name) = &name {
                    return Ok(name.clone());
                }
                module.to_string()
            }
            Some(rest) if rest.starts_with('.') => match (name.is_some(), alias.is_some()) {
                (false, true) => {
                    // `from .parent import child as alias`
                    let (parent, child) = rest.rsplit_once('.').unwrap_or(("", rest));
                    name = Some(child.to_string());
                    format!(".{}", parent.trim_start_matches('.'))
                }
                (false, false) => module.to_string(),
                (true, _) => rest.to_string(),
            },
            _ => module.to_string(),
        };

        let key = (name.clone(), alias.clone());
        if let Some(existing) = self.imports.get(&short).and_then(|m| m.get(&key)) {
            return Ok(existing.clone());
        }

        let resolved = match (&name, alias) {
            (_, Some(alias)) => alias,
            (Some(name), None) => self.free_name(module, name)?,
            (None, None) => module.to_string(),
        };

        debug!(module = %short, ?name, alias = %resolved, "registered import");
        self.imports
            .entry(short)
            .or_default()
            .insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Find a local name for `module.name` that does not shadow a different
    /// attribute of the target module.
    fn free_name(&self, module: &str, name: &str) -> Result<String> {
        let Some(target) = self.target else {
            return Ok(name.to_string());
        };
        let wanted = self.graph.resolve(module, name);

        let mut candidate = name.to_string();
        for _ in 0..MAX_ALIAS_ATTEMPTS {
            match target.attribute(&candidate) {
                None => return Ok(candidate),
                Some(existing) if wanted == Some(existing) => return Ok(candidate),
                Some(_) => candidate.insert(0, '_'),
            }
        }
        Err(Error::AliasExhausted {
            module: module.to_string(),
            name: name.to_string(),
            attempts: MAX_ALIAS_ATTEMPTS,
        })
    }

    /// Whether no import was registered.
    pub fn is_empty(&self) -> bool {
        self.imports.values().all(IndexMap::is_empty)
    }

    /// Render all import statements, grouped by source module in sorted order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (module, entries) in &self.imports {
            let mut items = Vec::new();
            for ((name, alias), resolved) in entries {
                match name {
                    None => match alias {
                        Some(alias) if alias != module => {
                            out.push_str(&format!("import {module} as {alias}\n"));
                        }
                        _ => out.push_str(&format!("import {module}\n")),
                    },
                    Some(name) if name != resolved || alias.is_some() => {
                        items.push(format!("{name} as {resolved}"));
                    }
                    Some(name) => items.push(name.clone()),
                }
            }

            if items.is_empty() {
                continue;
            }
            let single = format!("from {module} import {}\n", items.join(", "));
            if single.chars().count() <= IMPORT_LINE_WIDTH {
                out.push_str(&single);
            } else {
                out.push_str(&format!(
                    "from {module} import (\n    {}\n)\n",
                    items.join(",\n    ")
                ));
            }
        }
        out
    }
}
