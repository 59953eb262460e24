use crate::errors::{ContainerError, Result};
use crate::value::{Instance, Value};
use indexmap::IndexMap;
use std::any::Any;
use std::sync::Arc;

/// Resolved arguments handed to a constructor, method or factory
#[derive(Debug, Clone)]
pub struct Arguments {
    target: String,
    values: Vec<Value>,
}

impl Arguments {
    /// `target` names the callee in error messages, e.g. `Mailer::new`
    pub fn new(target: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            target: target.into(),
            values,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The argument at `index`, failing when it was not supplied
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| ContainerError::ArityMismatch {
            target: self.target.clone(),
            expected: index + 1,
            given: self.values.len(),
        })
    }

    /// The argument at `index`, `None` when absent or null
    pub fn optional(&self, index: usize) -> Option<&Value> {
        self.values.get(index).filter(|value| !value.is_null())
    }

    pub fn service<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let value = self.value(index)?;
        value
            .as_service::<T>()
            .ok_or_else(|| self.mismatch(index, std::any::type_name::<T>(), value))
    }

    pub fn instance(&self, index: usize) -> Result<Instance> {
        let value = self.value(index)?;
        value
            .as_instance()
            .cloned()
            .ok_or_else(|| self.mismatch(index, "service", value))
    }

    pub fn str(&self, index: usize) -> Result<&str> {
        let value = self.value(index)?;
        value.as_str().ok_or_else(|| self.mismatch(index, "string", value))
    }

    pub fn string(&self, index: usize) -> Result<String> {
        self.str(index).map(str::to_string)
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        let value = self.value(index)?;
        value.as_i64().ok_or_else(|| self.mismatch(index, "int", value))
    }

    pub fn float(&self, index: usize) -> Result<f64> {
        let value = self.value(index)?;
        value.as_f64().ok_or_else(|| self.mismatch(index, "float", value))
    }

    pub fn bool(&self, index: usize) -> Result<bool> {
        let value = self.value(index)?;
        value.as_bool().ok_or_else(|| self.mismatch(index, "bool", value))
    }

    pub fn list(&self, index: usize) -> Result<&[Value]> {
        let value = self.value(index)?;
        value.as_list().ok_or_else(|| self.mismatch(index, "list", value))
    }

    pub fn map(&self, index: usize) -> Result<&IndexMap<String, Value>> {
        let value = self.value(index)?;
        value.as_map().ok_or_else(|| self.mismatch(index, "map", value))
    }

    fn mismatch(&self, index: usize, expected: &str, found: &Value) -> ContainerError {
        ContainerError::InvalidArgument {
            target: self.target.clone(),
            index,
            expected: expected.to_string(),
            found: found.kind().to_string(),
        }
    }
}
