use crate::container::arguments::Arguments;
use crate::errors::{ContainerError, Result};
use crate::value::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// A freshly constructed object, not yet shared
pub type Object = Box<dyn Any + Send + Sync>;

/// Constructor taking the final argument list
pub type ConstructorFn = Box<dyn Fn(Arguments) -> Result<Object> + Send + Sync>;

/// Method invoked on a new instance after construction
pub type MethodFn = Box<dyn Fn(&mut (dyn Any + Send + Sync), Arguments) -> Result<()> + Send + Sync>;

/// Associated function producing an object (`Class:method` factories)
pub type FactoryFn = Box<dyn Fn(Arguments) -> Result<Object> + Send + Sync>;

/// Method on an existing service producing an object (`@service:method` factories)
pub type InstanceFactoryFn =
    Box<dyn Fn(&(dyn Any + Send + Sync), Arguments) -> Result<Object> + Send + Sync>;

/// Built-in parameter types that are never autowired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
}

/// Declared type of a constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// A class name; autowirable when a service is registered under it
    Class(String),
    Primitive(Primitive),
    Untyped,
}

/// One entry of a constructor signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub hint: TypeHint,
    pub optional: bool,
}

impl ParameterSpec {
    pub fn class(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: TypeHint::Class(class.into()),
            optional: false,
        }
    }

    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            hint: TypeHint::Primitive(primitive),
            optional: false,
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: TypeHint::Untyped,
            optional: false,
        }
    }

    /// Mark the parameter as having a default
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The class name this parameter is hinted with, if any
    pub fn class_hint(&self) -> Option<&str> {
        match &self.hint {
            TypeHint::Class(class) => Some(class),
            _ => None,
        }
    }
}

/// Everything the container knows about a registrable class
pub struct ClassDescriptor {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    signature: Vec<ParameterSpec>,
    constructor: Option<ConstructorFn>,
    methods: HashMap<String, MethodFn>,
    factories: HashMap<String, FactoryFn>,
    instance_factories: HashMap<String, InstanceFactoryFn>,
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("signature", &self.signature)
            .field("constructible", &self.constructor.is_some())
            .field("methods", &methods)
            .finish()
    }
}

impl ClassDescriptor {
    /// Start describing class `name`, implemented by `T`
    pub fn builder<T: Any + Send + Sync>(name: impl Into<String>) -> ClassDescriptorBuilder<T> {
        ClassDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Constructor parameters in declaration order
    pub fn signature(&self) -> &[ParameterSpec] {
        &self.signature
    }

    /// Number of leading parameters that must be supplied
    pub fn required_arity(&self) -> usize {
        self.signature
            .iter()
            .rposition(|parameter| !parameter.optional)
            .map_or(0, |index| index + 1)
    }

    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Run the constructor with the final argument list
    pub fn instantiate(&self, values: Vec<Value>) -> Result<Object> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or_else(|| ContainerError::NotConstructible {
                class: self.name.clone(),
            })?;

        let target = format!("{}::new", self.name);
        let required = self.required_arity();
        if values.len() < required {
            return Err(ContainerError::ArityMismatch {
                target,
                expected: required,
                given: values.len(),
            });
        }

        constructor(Arguments::new(target, values))
    }

    /// Invoke a registered method on an instance of this class
    pub fn call(
        &self,
        object: &mut (dyn Any + Send + Sync),
        method: &str,
        values: Vec<Value>,
    ) -> Result<()> {
        let callback = self.methods.get(method).ok_or_else(|| self.method_not_found(method))?;
        callback(object, Arguments::new(format!("{}::{}", self.name, method), values))
    }

    /// Invoke an associated factory function
    pub fn invoke_factory(&self, method: &str, values: Vec<Value>) -> Result<Object> {
        let factory = self
            .factories
            .get(method)
            .ok_or_else(|| self.method_not_found(method))?;
        factory(Arguments::new(format!("{}::{}", self.name, method), values))
    }

    /// Invoke a factory method on an existing instance of this class
    pub fn invoke_instance_factory(
        &self,
        receiver: &(dyn Any + Send + Sync),
        method: &str,
        values: Vec<Value>,
    ) -> Result<Object> {
        let factory = self
            .instance_factories
            .get(method)
            .ok_or_else(|| self.method_not_found(method))?;
        factory(receiver, Arguments::new(format!("{}::{}", self.name, method), values))
    }

    fn method_not_found(&self, method: &str) -> ContainerError {
        ContainerError::MethodNotFound {
            class: self.name.clone(),
            method: method.to_string(),
        }
    }
}

/// Typed builder for [`ClassDescriptor`]
pub struct ClassDescriptorBuilder<T> {
    name: String,
    signature: Vec<ParameterSpec>,
    constructor: Option<ConstructorFn>,
    methods: HashMap<String, MethodFn>,
    factories: HashMap<String, FactoryFn>,
    instance_factories: HashMap<String, InstanceFactoryFn>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> ClassDescriptorBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: Vec::new(),
            constructor: None,
            methods: HashMap::new(),
            factories: HashMap::new(),
            instance_factories: HashMap::new(),
            _phantom: PhantomData,
        }
    }

    /// Append a constructor parameter
    pub fn param(mut self, parameter: ParameterSpec) -> Self {
        self.signature.push(parameter);
        self
    }

    /// Append a parameter hinted with a class name
    pub fn class_param(self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.param(ParameterSpec::class(name, class))
    }

    /// Append a parameter of a built-in type
    pub fn primitive_param(self, name: impl Into<String>, primitive: Primitive) -> Self {
        self.param(ParameterSpec::primitive(name, primitive))
    }

    pub fn untyped_param(self, name: impl Into<String>) -> Self {
        self.param(ParameterSpec::untyped(name))
    }

    /// Set the constructor
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(Arguments) -> Result<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Box::new(move |args: Arguments| {
            let instance = constructor(args)?;
            Ok(Box::new(instance) as Object)
        }));
        self
    }

    /// Register a method callable from a definition's `calls`
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut T, Arguments) -> Result<()> + Send + Sync + 'static,
    {
        let class = self.name.clone();
        self.methods.insert(
            name.into(),
            Box::new(move |object: &mut (dyn Any + Send + Sync), args: Arguments| {
                let this = object.downcast_mut::<T>().ok_or_else(|| ContainerError::TypeMismatch {
                    service: args.target().to_string(),
                    expected: class.clone(),
                })?;
                method(this, args)
            }),
        );
        self
    }

    /// Register an associated factory function (`Class:method`)
    pub fn factory<U, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        U: Any + Send + Sync,
        F: Fn(Arguments) -> Result<U> + Send + Sync + 'static,
    {
        self.factories.insert(
            name.into(),
            Box::new(move |args: Arguments| {
                let product = factory(args)?;
                Ok(Box::new(product) as Object)
            }),
        );
        self
    }

    /// Register a factory method on instances (`@service:method`)
    pub fn instance_factory<U, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        U: Any + Send + Sync,
        F: Fn(&T, Arguments) -> Result<U> + Send + Sync + 'static,
    {
        let class = self.name.clone();
        self.instance_factories.insert(
            name.into(),
            Box::new(move |receiver: &(dyn Any + Send + Sync), args: Arguments| {
                let this = receiver.downcast_ref::<T>().ok_or_else(|| ContainerError::TypeMismatch {
                    service: args.target().to_string(),
                    expected: class.clone(),
                })?;
                let product = factory(this, args)?;
                Ok(Box::new(product) as Object)
            }),
        );
        self
    }

    pub fn build(self) -> ClassDescriptor {
        ClassDescriptor {
            name: self.name,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            signature: self.signature,
            constructor: self.constructor,
            methods: self.methods,
            factories: self.factories,
            instance_factories: self.instance_factories,
        }
    }
}

/// Registry of classes the container can instantiate, by name and by Rust type
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDescriptor>,
    types: HashMap<TypeId, String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any class of the same name
    pub fn register(&mut self, descriptor: ClassDescriptor) {
        self.types
            .insert(descriptor.type_id(), descriptor.name().to_string());
        self.classes.insert(descriptor.name().to_string(), descriptor);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, descriptor: ClassDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Result<&ClassDescriptor> {
        self.classes
            .get(name)
            .ok_or_else(|| ContainerError::class_not_found(name))
    }

    pub fn find(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    /// Find the class implemented by the given Rust type
    pub fn find_by_type(&self, type_id: TypeId) -> Option<&ClassDescriptor> {
        self.types
            .get(&type_id)
            .and_then(|name| self.classes.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
