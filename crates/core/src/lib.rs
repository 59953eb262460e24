pub mod errors;
pub mod value;
pub mod constants;
pub mod config;
pub mod container;

// Re-export key types for convenience
pub use errors::{ContainerError, Result};
pub use value::{Instance, Value};
pub use config::{ConfigError, ConfigSource, ContainerConfig};
pub use container::{
    Arguments, ClassDescriptor, ClassRegistry, Container, ContainerAware, ContainerBuilder,
    Definition, Factory, MethodCall, ParameterSpec, Primitive, ServiceRecord,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
