//! Arena holding every reflected object of one export.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{Module, ModelError, Object, ObjectId, Result, Value, ValueData};

/// All objects reachable from a root module.
///
/// Objects are addressed by [`ObjectId`]. Modules other than the root may
/// appear too (for instance `typing`), which lets import resolution decide
/// whether two names refer to the same object.
///
/// # Example
///
/// ```
/// use nbstub_model::{Module, Object, ObjectGraph, Value, ValueData};
///
/// let mut graph = ObjectGraph::new();
/// let answer = graph.push(Object::Value(Value::builtin(ValueData::Int(42))));
/// let root = graph.push(Object::Module(Module::new("ext").member("ANSWER", answer)));
/// graph.set_root(root);
///
/// assert!(graph.validate().is_ok());
/// assert_eq!(graph.root_module().unwrap().name, "ext");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectGraph {
    #[serde(default)]
    root: ObjectId,
    objects: Vec<Object>,
}

impl ObjectGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON export.
    pub fn from_json(src: &str) -> Result<Self> {
        let graph: ObjectGraph = serde_json::from_str(src)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Add an object and return its id.
    pub fn push(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    /// Reserve an id to be filled in later with [`set`](Self::set).
    ///
    /// Needed to build objects that refer to themselves.
    pub fn reserve(&mut self) -> ObjectId {
        self.push(Object::Value(Value::builtin(ValueData::Opaque)))
    }

    /// Replace the object stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this graph.
    pub fn set(&mut self, id: ObjectId, object: Object) {
        self.objects[id.index()] = object;
    }

    /// Set the root module.
    pub fn set_root(&mut self, id: ObjectId) {
        self.root = id;
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// The root module, if the root is a module.
    pub fn root_module(&self) -> Option<&Module> {
        self.get(self.root).and_then(Object::as_module)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over all objects with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i), o))
    }

    /// Find a module by its fully qualified name.
    pub fn find_module(&self, name: &str) -> Option<(ObjectId, &Module)> {
        self.iter().find_map(|(id, o)| match o {
            Object::Module(m) if m.name == name => Some((id, m)),
            _ => None,
        })
    }

    /// Resolve `module.name` to an object, if both are part of the graph.
    pub fn resolve(&self, module: &str, name: &str) -> Option<ObjectId> {
        self.find_module(module)
            .and_then(|(_, m)| m.attribute(name))
    }

    /// Check that the root is a module and that no object refers to an id
    /// outside the graph.
    pub fn validate(&self) -> Result<()> {
        if self.objects.is_empty() {
            return Err(ModelError::Empty);
        }
        for (owner, object) in self.iter() {
            if let Some(target) = object
                .references()
                .into_iter()
                .find(|r| r.index() >= self.objects.len())
            {
                return Err(ModelError::DanglingReference { owner, target });
            }
        }
        match self.get(self.root) {
            Some(Object::Module(_)) => Ok(()),
            _ => Err(ModelError::RootNotModule(self.root)),
        }
    }
}

impl Index<ObjectId> for ObjectGraph {
    type Output = Object;

    fn index(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }
}
