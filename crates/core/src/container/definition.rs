use crate::container::record::{CallRecord, FactoryRecord, ServiceRecord};
use crate::container::reference::Argument;
use crate::errors::{ContainerError, Result};
use crate::value::Value;

/// A `(provider, method)` factory pair
///
/// The provider resolves either to a service instance (`@id`) or to a
/// class name; both halves go through reference resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Factory {
    provider: Argument,
    method: Argument,
}

impl Factory {
    pub fn new(provider: impl Into<Value>, method: impl Into<Value>) -> Self {
        Self {
            provider: Argument::parse(provider.into()),
            method: Argument::parse(method.into()),
        }
    }

    /// Split a `"Class:method"` string at its last colon
    ///
    /// `"app::Factory:create"` and `"app::Factory::create"` both name the
    /// `create` method of `app::Factory`.
    pub fn parse(joined: &str) -> Option<Self> {
        let (provider, method) = joined.rsplit_once(':')?;
        let provider = provider.strip_suffix(':').unwrap_or(provider);
        if provider.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self::new(provider, method))
    }

    pub fn provider(&self) -> &Argument {
        &self.provider
    }

    pub fn method(&self) -> &Argument {
        &self.method
    }
}

/// A method invoked on a service right after construction
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    name: String,
    arguments: Vec<Argument>,
}

impl MethodCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn from_record(record: CallRecord) -> Self {
        Self::new(record.method).with_arguments(record.arguments)
    }

    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments.into_iter().map(Argument::parse).collect();
        self
    }

    pub fn with_argument(mut self, argument: impl Into<Value>) -> Self {
        self.arguments.push(Argument::parse(argument.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }
}

/// Recipe for constructing one service
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    class: Option<String>,
    factory: Option<Factory>,
    arguments: Vec<Argument>,
    method_calls: Vec<MethodCall>,
    lazy: bool,
    public: bool,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            class: None,
            factory: None,
            arguments: Vec::new(),
            method_calls: Vec::new(),
            lazy: false,
            public: true,
        }
    }
}

impl Definition {
    /// Create an empty definition; a class or factory must be set before registration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a definition instantiating `class` directly
    pub fn for_class(class: impl Into<String>) -> Self {
        Self::new().with_class(class)
    }

    /// Create a definition built by a factory
    pub fn for_factory(factory: Factory) -> Self {
        Self::new().with_factory(factory)
    }

    /// Build a definition from a raw record
    pub fn from_record(id: &str, record: ServiceRecord) -> Result<Self> {
        if record.class.is_none() && record.factory.is_none() {
            return Err(ContainerError::invalid_definition(
                id,
                "a definition needs either a 'class' or a 'factory'",
            ));
        }

        let mut definition = Self::new()
            .with_lazy(record.lazy)
            .with_public(record.public)
            .with_arguments(record.arguments);

        if let Some(class) = record.class {
            definition = definition.with_class(class);
        }

        if let Some(factory) = record.factory {
            let factory = match factory {
                FactoryRecord::Pair(provider, method) => Factory::new(provider, method),
                FactoryRecord::Joined(joined) => Factory::parse(&joined).ok_or_else(|| {
                    ContainerError::invalid_definition(
                        id,
                        format!("factory '{}' is not of the form 'Class:method'", joined),
                    )
                })?,
            };
            definition = definition.with_factory(factory);
        }

        for call in record.calls {
            definition = definition.with_method_call(MethodCall::from_record(call));
        }

        Ok(definition)
    }

    /// Check that the definition can be constructed
    pub fn validate(&self, id: &str) -> Result<()> {
        if self.class.is_none() && self.factory.is_none() {
            return Err(ContainerError::invalid_definition(
                id,
                "a definition needs either a 'class' or a 'factory'",
            ));
        }
        Ok(())
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.set_arguments(arguments);
        self
    }

    pub fn with_argument(mut self, argument: impl Into<Value>) -> Self {
        self.arguments.push(Argument::parse(argument.into()));
        self
    }

    pub fn with_method_call(mut self, call: MethodCall) -> Self {
        self.add_method_call(call);
        self
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Replace the constructor arguments
    pub fn set_arguments(&mut self, arguments: Vec<Value>) {
        self.arguments = arguments.into_iter().map(Argument::parse).collect();
    }

    pub fn add_method_call(&mut self, call: MethodCall) {
        self.method_calls.push(call);
    }

    pub fn set_lazy(&mut self, lazy: bool) {
        self.lazy = lazy;
    }

    pub fn set_public(&mut self, public: bool) {
        self.public = public;
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn factory(&self) -> Option<&Factory> {
        self.factory.as_ref()
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn method_calls(&self) -> &[MethodCall] {
        &self.method_calls
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn is_public(&self) -> bool {
        self.public
    }
}
