use crate::container::container::Container;
use crate::errors::Result;
use crate::value::Value;
use std::any::Any;
use std::sync::Arc;

/// Types that hold a container and forward lookups to it
pub trait ContainerAware {
    fn container(&self) -> &Container;

    fn container_mut(&mut self) -> &mut Container;

    /// Get a public service from the held container
    fn get<T: Any + Send + Sync>(&mut self, id: &str) -> Result<Arc<T>> {
        self.container_mut().get::<T>(id)
    }

    fn get_parameter(&self, key: &str) -> Result<&Value> {
        self.container().get_parameter(key)
    }

    fn get_parameter_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.container().get_parameter_or(key, default)
    }
}
