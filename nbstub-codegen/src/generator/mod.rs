//! The stub generator.

mod members;
mod visit;

use nbstub_model::{Module, ObjectGraph, ObjectId};
use nbstub_rules::RuleSet;
use tracing::debug;

use crate::{
    Error, Result, StubConfig,
    builder::OutputBuffer,
    generation::{EnumBases, ImportResolver},
    render::{Canonicalizer, ExprRenderer},
};

/// Generates the stub of one module.
///
/// A generator visits its root module once and is then materialized into
/// the stub text. All state (output, imports, visit stack, enumeration
/// bases) belongs to the instance, so independent modules need independent
/// generators.
///
/// # Example
///
/// ```
/// use nbstub_codegen::{StubConfig, StubGen};
/// use nbstub_model::{Function, Module, Object, ObjectGraph, Overload};
///
/// let mut graph = ObjectGraph::new();
/// let f = graph.push(Object::Function(
///     Function::binding("f", vec![Overload::new("def f(x: int) -> int")]).module("ext"),
/// ));
/// let root = graph.push(Object::Module(Module::new("ext").member("f", f)));
/// graph.set_root(root);
///
/// let mut stubgen = StubGen::new(&graph, StubConfig::default()).unwrap();
/// stubgen.generate().unwrap();
/// assert_eq!(stubgen.materialize(), "def f(x: int) -> int: ...\n");
/// ```
#[derive(Debug)]
pub struct StubGen<'g> {
    graph: &'g ObjectGraph,
    target: &'g Module,
    config: StubConfig,
    rules: RuleSet,
    canon: Canonicalizer,
    imports: ImportResolver<'g>,
    out: OutputBuffer,
    /// Objects currently being visited.
    stack: Vec<ObjectId>,
    /// Dotted path of the object being visited, matched against rules.
    prefix: String,
    enums: EnumBases,
    generated: bool,
}

impl<'g> StubGen<'g> {
    /// Create a generator for the root module of `graph`.
    pub fn new(graph: &'g ObjectGraph, config: StubConfig) -> Result<Self> {
        let target = graph
            .root_module()
            .ok_or(Error::NotAModule(graph.root()))?;
        let canon = Canonicalizer::new(&target.name, config.python_version)?;
        Ok(Self {
            graph,
            target,
            config,
            rules: RuleSet::new(),
            canon,
            imports: ImportResolver::new(graph, target.name.clone()),
            out: OutputBuffer::new(),
            stack: Vec::new(),
            prefix: target.name.clone(),
            enums: EnumBases::default(),
            generated: false,
        })
    }

    /// Apply pattern rules while visiting.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Visit the root module. A generator can only do this once.
    pub fn generate(&mut self) -> Result<()> {
        if self.generated {
            return Err(Error::AlreadyGenerated);
        }
        self.generated = true;
        debug!(module = %self.target.name, "generating stub");
        self.visit(self.graph.root(), None, None, None)
    }

    /// Visit any object of the graph as a member of the target module.
    pub fn put(&mut self, id: ObjectId) -> Result<()> {
        let target = self.target;
        self.visit(id, Some(target.name.as_str()), None, None)
    }

    /// The complete stub text: imports, shared enumeration bases, then the
    /// visited declarations, ending in exactly one newline.
    pub fn materialize(&self) -> String {
        let mut text = self.imports.render();
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&self.enums.render());
        text.push_str(self.out.as_str());

        let mut text = text.trim_end().to_string();
        text.push('\n');
        text
    }

    /// The rule set, with match counters updated by the visit.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn into_rules(self) -> RuleSet {
        self.rules
    }

    fn renderer(&mut self) -> ExprRenderer<'_, 'g> {
        ExprRenderer::new(
            self.graph,
            &self.canon,
            &mut self.imports,
            self.config.max_expr_length,
        )
    }
}

/// The result of a complete generation run.
#[derive(Debug, Clone)]
pub struct StubOutput {
    /// Fully qualified name of the module the stub describes.
    pub module: String,
    /// The stub text.
    pub stub: String,
    /// The rules applied, with their match counters.
    pub rules: RuleSet,
}

/// Generate the stub for the root module of `graph`.
pub fn generate_stub(
    graph: &ObjectGraph,
    config: StubConfig,
    rules: Option<RuleSet>,
) -> Result<StubOutput> {
    let mut stubgen = StubGen::new(graph, config)?;
    if let Some(rules) = rules {
        stubgen = stubgen.with_rules(rules);
    }
    stubgen.generate()?;
    Ok(StubOutput {
        module: stubgen.target.name.clone(),
        stub: stubgen.materialize(),
        rules: stubgen.into_rules(),
    })
}
