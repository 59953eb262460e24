use crate::constants;
use crate::container::reference::{Argument, ParameterRef, Segment};
use crate::errors::{ContainerError, Result};
use crate::value::{Instance, Value};

/// Source of everything a reference can point at
///
/// Implemented by the container; the resolver never touches the
/// container's tables directly.
pub trait ReferenceLookup {
    /// Get or create a service for injection (visibility is not enforced)
    fn service(&mut self, id: &str) -> Result<Instance>;

    /// Look up a parameter by key
    fn parameter(&mut self, name: &str) -> Result<Value>;

    /// Look up an environment variable, `Value::Null` when absent
    fn env(&mut self, var: &str) -> Result<Value>;

    /// Look up a named constant
    fn constant(&mut self, name: &str) -> Result<Value> {
        constants::get(name)
    }
}

/// Turns parsed arguments into concrete values
pub struct Resolver<'a, L: ReferenceLookup + ?Sized> {
    lookup: &'a mut L,
}

impl<'a, L: ReferenceLookup + ?Sized> Resolver<'a, L> {
    pub fn new(lookup: &'a mut L) -> Self {
        Self { lookup }
    }

    /// Resolve a single argument, recursing into lists and maps
    pub fn resolve(&mut self, argument: &Argument) -> Result<Value> {
        match argument {
            Argument::Literal(value) => Ok(value.clone()),
            Argument::Service(id) => self.lookup.service(id).map(Value::Service),
            Argument::Parameter(reference) => self.resolve_reference(reference),
            Argument::Template(segments) => self.render(segments).map(Value::String),
            Argument::List(items) => self.resolve_all(items).map(Value::List),
            Argument::Map(map) => {
                let mut resolved = indexmap::IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    resolved.insert(key.clone(), self.resolve(item)?);
                }
                Ok(Value::Map(resolved))
            }
        }
    }

    /// Resolve an ordered argument list
    pub fn resolve_all(&mut self, arguments: &[Argument]) -> Result<Vec<Value>> {
        arguments.iter().map(|argument| self.resolve(argument)).collect()
    }

    /// Resolve a `%...%` reference, keeping the referenced value's type
    pub fn resolve_reference(&mut self, reference: &ParameterRef) -> Result<Value> {
        match reference {
            ParameterRef::Named(name) => self.lookup.parameter(name),
            ParameterRef::Env(var) => self.lookup.env(var),
            ParameterRef::Constant(name) => self.lookup.constant(name),
        }
    }

    fn render(&mut self, segments: &[Segment]) -> Result<String> {
        let mut rendered = String::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Reference(reference) => {
                    let value = self.resolve_reference(reference)?;
                    let text = value.to_substitution().ok_or_else(|| {
                        ContainerError::invalid_reference(
                            reference.to_string(),
                            format!("a {} cannot be embedded in a string", value.kind()),
                        )
                    })?;
                    rendered.push_str(&text);
                }
            }
        }
        Ok(rendered)
    }
}

/// Ids currently being resolved, innermost last
#[derive(Debug, Clone, Default)]
pub struct ResolutionPath {
    entries: Vec<String>,
}

impl ResolutionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>) {
        self.entries.push(id.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Error for re-entering `id`, reporting the path from its first entry
    pub fn cycle_error(&self, id: &str) -> ContainerError {
        let start = self
            .entries
            .iter()
            .position(|entry| entry == id)
            .unwrap_or(0);
        let mut path: Vec<&str> = self.entries[start..].iter().map(String::as_str).collect();
        path.push(id);

        ContainerError::CyclicDependency {
            path: path.join(" -> "),
            service: id.to_string(),
        }
    }
}
