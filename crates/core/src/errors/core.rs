use thiserror::Error;

/// Error type for every container operation
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Invalid definition for service '{service}': {message}")]
    InvalidDefinition { service: String, message: String },

    #[error("Service not found: {service}")]
    ServiceNotFound { service: String },

    #[error("Service '{service}' is not public")]
    ServiceNotPublic { service: String },

    #[error("Parameter not found: {name}")]
    ParameterNotFound { name: String },

    #[error("Cyclic dependency detected: {path} (cycle at: {service})")]
    CyclicDependency { path: String, service: String },

    #[error("Container already built: {message}")]
    ContainerBuilt { message: String },

    #[error("Class not registered: {class}")]
    ClassNotFound { class: String },

    #[error("Method '{method}' is not registered on class '{class}'")]
    MethodNotFound { class: String, method: String },

    #[error("Class '{class}' has no registered constructor")]
    NotConstructible { class: String },

    #[error("Constant not defined: {name}")]
    ConstantNotFound { name: String },

    #[error("Arity mismatch calling '{target}': expected at least {expected} arguments, {given} given")]
    ArityMismatch {
        target: String,
        expected: usize,
        given: usize,
    },

    #[error("Invalid argument #{index} for '{target}': expected {expected}, found {found}")]
    InvalidArgument {
        target: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Service '{service}' is not of type {expected}")]
    TypeMismatch { service: String, expected: String },

    #[error("Invalid reference '{reference}': {message}")]
    InvalidReference { reference: String, message: String },

    #[error("Construction of '{target}' failed: {message}")]
    ServiceConstruction { target: String, message: String },

    #[error("Lock error on resource: {resource}")]
    LockError { resource: String },
}

impl ContainerError {
    /// Create an invalid definition error
    pub fn invalid_definition(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a service not found error
    pub fn service_not_found(service: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    /// Create a service not public error
    pub fn service_not_public(service: impl Into<String>) -> Self {
        Self::ServiceNotPublic {
            service: service.into(),
        }
    }

    /// Create a parameter not found error
    pub fn parameter_not_found(name: impl Into<String>) -> Self {
        Self::ParameterNotFound { name: name.into() }
    }

    /// Create a class not found error
    pub fn class_not_found(class: impl Into<String>) -> Self {
        Self::ClassNotFound {
            class: class.into(),
        }
    }

    /// Create an invalid reference error
    pub fn invalid_reference(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a construction failure raised from inside a constructor, method or factory
    pub fn construction(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServiceConstruction {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Check if the error is a missing service
    pub fn is_service_not_found(&self) -> bool {
        matches!(self, Self::ServiceNotFound { .. })
    }

    /// Check if the error is a visibility failure
    pub fn is_service_not_public(&self) -> bool {
        matches!(self, Self::ServiceNotPublic { .. })
    }

    /// Check if the error is a missing parameter
    pub fn is_parameter_not_found(&self) -> bool {
        matches!(self, Self::ParameterNotFound { .. })
    }

    /// Check if the error is an invalid definition
    pub fn is_invalid_definition(&self) -> bool {
        matches!(self, Self::InvalidDefinition { .. })
    }

    /// Check if the error is a dependency cycle
    pub fn is_cyclic_dependency(&self) -> bool {
        matches!(self, Self::CyclicDependency { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
