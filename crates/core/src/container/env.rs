use crate::value::Value;
use std::collections::HashMap;

/// Container-scoped cache of environment lookups
///
/// Holds the final value of every `%env(VAR)%` resolution, including the
/// parameter fallback and negative results (`Value::Null`).
#[derive(Debug, Default)]
pub struct EnvCache {
    entries: HashMap<String, Value>,
}

impl EnvCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &str) -> Option<&Value> {
        self.entries.get(var)
    }

    pub fn insert(&mut self, var: impl Into<String>, value: Value) {
        self.entries.insert(var.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a variable from the process environment; unset, empty and
    /// non-unicode values are all treated as absent
    pub fn read_process(var: &str) -> Option<String> {
        std::env::var(var).ok().filter(|value| !value.is_empty())
    }

    /// Name of the parameter consulted when the variable is absent
    pub fn fallback_parameter(var: &str) -> String {
        format!("env({})", var)
    }
}
