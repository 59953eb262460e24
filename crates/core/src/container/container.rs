use crate::config::ContainerConfig;
use crate::container::autowiring::{Autowirer, ServiceInjector};
use crate::container::definition::{Definition, Factory};
use crate::container::descriptor::{ClassRegistry, Object};
use crate::container::env::EnvCache;
use crate::container::reference::Argument;
use crate::container::resolver::{ReferenceLookup, ResolutionPath, Resolver};
use crate::errors::{ContainerError, Result};
use crate::value::{Instance, Value};
use indexmap::IndexMap;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A parameter as stored in the table
#[derive(Debug, Clone)]
enum Parameter {
    /// Loaded but not yet passed through the resolver
    Pending(Argument),
    Resolved(Value),
}

/// Service container
///
/// Owns the definition table, the parameter table, the singleton instance
/// cache and the environment cache. Every service is constructed at most
/// once and lives as long as the container.
pub struct Container {
    definitions: IndexMap<String, Definition>,
    instances: HashMap<String, Instance>,
    parameters: IndexMap<String, Parameter>,
    classes: Arc<ClassRegistry>,
    env: EnvCache,
    autowirer: Option<Autowirer>,
    in_flight: ResolutionPath,
    resolving_parameters: ResolutionPath,
    built: bool,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .field("instances", &self.instances.len())
            .field("parameters", &self.parameters.keys().collect::<Vec<_>>())
            .field("autowire", &self.autowirer.is_some())
            .field("built", &self.built)
            .finish()
    }
}

impl Container {
    /// Create an empty container able to instantiate the given classes
    pub fn new(classes: impl Into<Arc<ClassRegistry>>) -> Self {
        Self::with_config(classes, &ContainerConfig::default())
    }

    pub fn with_config(classes: impl Into<Arc<ClassRegistry>>, config: &ContainerConfig) -> Self {
        tracing::debug!(
            "Autowiring {} (from {:?})",
            if config.autowire { "enabled" } else { "disabled" },
            config.source()
        );
        Self {
            definitions: IndexMap::new(),
            instances: HashMap::new(),
            parameters: IndexMap::new(),
            classes: classes.into(),
            env: EnvCache::new(),
            autowirer: config.autowire.then(Autowirer::new),
            in_flight: ResolutionPath::new(),
            resolving_parameters: ResolutionPath::new(),
            built: false,
        }
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn is_autowiring(&self) -> bool {
        self.autowirer.is_some()
    }

    /// Get a public service, constructing it on first access
    pub fn get<T: Any + Send + Sync>(&mut self, id: &str) -> Result<Arc<T>> {
        let instance = self.get_instance(id)?;
        instance
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                service: id.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// Type-erased [`get`](Self::get)
    ///
    /// The visibility check runs after construction, so a private service is
    /// still built and cached by a failed call.
    pub fn get_instance(&mut self, id: &str) -> Result<Instance> {
        let instance = self.get_or_create(id)?;

        let public = self
            .definitions
            .get(id)
            .map_or(true, Definition::is_public);
        if !public {
            return Err(ContainerError::service_not_public(id));
        }

        Ok(instance)
    }

    /// Whether `id` has already been constructed
    pub fn has(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    /// Whether a definition is registered under `id`
    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Register a definition, replacing any previous one under the same id
    pub fn register(&mut self, id: impl Into<String>, definition: Definition) -> Result<()> {
        let id = id.into();
        definition.validate(&id)?;

        if self.definitions.contains_key(&id) {
            tracing::debug!("Replacing definition for service: {}", id);
        }
        self.definitions.insert(id, definition);
        Ok(())
    }

    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    /// Mutable access to a definition that has not been used yet
    pub fn definition_mut(&mut self, id: &str) -> Result<&mut Definition> {
        if self.built {
            return Err(ContainerError::ContainerBuilt {
                message: format!("cannot modify definition '{}' after the build pass", id),
            });
        }

        if self.instances.contains_key(id) {
            return Err(ContainerError::ContainerBuilt {
                message: format!("service '{}' has already been created", id),
            });
        }

        self.definitions
            .get_mut(id)
            .ok_or_else(|| ContainerError::service_not_found(id))
    }

    /// Registered service ids in registration order
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Get a resolved parameter
    pub fn get_parameter(&self, key: &str) -> Result<&Value> {
        match self.parameters.get(key) {
            Some(Parameter::Resolved(value)) => Ok(value),
            _ => Err(ContainerError::parameter_not_found(key)),
        }
    }

    /// Get a parameter, falling back to `default` when it is absent
    pub fn get_parameter_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get_parameter(key)
            .map(Value::clone)
            .unwrap_or_else(|_| default.into())
    }

    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }

    /// Store a parameter after passing it once through reference resolution
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let argument = Argument::parse(value.into());
        let resolved = Resolver::new(self).resolve(&argument)?;
        tracing::trace!("Parameter {} set to {:?}", key, resolved);
        self.parameters.insert(key, Parameter::Resolved(resolved));
        Ok(())
    }

    /// Resolved parameters in declaration order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.parameters.iter().filter_map(|(key, parameter)| match parameter {
            Parameter::Resolved(value) => Some((key.as_str(), value)),
            Parameter::Pending(_) => None,
        })
    }

    /// Load raw parameters and resolve all of them
    ///
    /// Parameters may reference each other in any order; each one is
    /// resolved exactly once.
    pub fn load_parameters(&mut self, raw: IndexMap<String, Value>) -> Result<()> {
        for (key, value) in raw {
            self.parameters
                .insert(key, Parameter::Pending(Argument::parse(value)));
        }

        let pending: Vec<String> = self
            .parameters
            .iter()
            .filter(|(_, parameter)| matches!(parameter, Parameter::Pending(_)))
            .map(|(key, _)| key.clone())
            .collect();

        for key in pending {
            self.resolve_parameter(&key)?;
        }
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Build pass: construct every non-lazy service in registration order
    pub fn instantiate_services(&mut self) -> Result<()> {
        if self.built {
            return Err(ContainerError::ContainerBuilt {
                message: "the build pass has already run".to_string(),
            });
        }

        let eager: Vec<String> = self
            .definitions
            .iter()
            .filter(|(_, definition)| !definition.is_lazy())
            .map(|(id, _)| id.clone())
            .collect();

        for id in &eager {
            self.get_or_create(id)?;
        }

        self.built = true;
        tracing::info!(
            "Container built: {} eager of {} services instantiated",
            eager.len(),
            self.definitions.len()
        );
        Ok(())
    }

    /// Get-or-create without the visibility check
    fn get_or_create(&mut self, id: &str) -> Result<Instance> {
        if let Some(instance) = self.instances.get(id) {
            return Ok(Arc::clone(instance));
        }

        let definition = self
            .definitions
            .get(id)
            .cloned()
            .ok_or_else(|| ContainerError::service_not_found(id))?;

        if self.in_flight.contains(id) {
            return Err(self.in_flight.cycle_error(id));
        }

        self.in_flight.push(id);
        let created = self.create(id, &definition);
        self.in_flight.pop();

        let instance = created?;
        self.instances.insert(id.to_string(), Arc::clone(&instance));
        Ok(instance)
    }

    fn create(&mut self, id: &str, definition: &Definition) -> Result<Instance> {
        tracing::debug!("Creating service: {}", id);
        let classes = Arc::clone(&self.classes);

        let arguments = Resolver::new(self).resolve_all(definition.arguments())?;

        let mut object = match definition.factory() {
            Some(factory) => self.invoke_factory(id, factory, &classes, arguments)?,
            None => {
                let name = definition.class().ok_or_else(|| {
                    ContainerError::invalid_definition(
                        id,
                        "a definition needs either a 'class' or a 'factory'",
                    )
                })?;
                let class = classes.get(name)?;

                let arguments = match self.autowirer {
                    Some(autowirer) => {
                        autowirer.fill_missing_arguments(class.signature(), arguments, self)?
                    }
                    None => arguments,
                };

                class.instantiate(arguments)?
            }
        };

        if !definition.method_calls().is_empty() {
            let class = match definition.class() {
                Some(name) => classes.get(name)?,
                None => classes.find_by_type((*object).type_id()).ok_or_else(|| {
                    ContainerError::invalid_definition(
                        id,
                        "the factory product has no registered class to dispatch method calls on",
                    )
                })?,
            };

            for call in definition.method_calls() {
                let values = Resolver::new(self).resolve_all(call.arguments())?;
                tracing::trace!("Calling {}::{} on service {}", class.name(), call.name(), id);
                class.call(object.as_mut(), call.name(), values)?;
            }
        }

        let instance: Instance = Arc::from(object);
        Ok(instance)
    }

    fn invoke_factory(
        &mut self,
        id: &str,
        factory: &Factory,
        classes: &ClassRegistry,
        arguments: Vec<Value>,
    ) -> Result<Object> {
        let provider = Resolver::new(self).resolve(factory.provider())?;
        let method = Resolver::new(self).resolve(factory.method())?;
        let Some(method) = method.as_str() else {
            return Err(ContainerError::invalid_definition(
                id,
                format!("factory method must be a string, found {}", method.kind()),
            ));
        };

        match provider {
            Value::Service(receiver) => {
                let class = classes.find_by_type((*receiver).type_id()).ok_or_else(|| {
                    ContainerError::invalid_definition(
                        id,
                        "the factory service has no registered class",
                    )
                })?;
                tracing::trace!("Invoking factory {}::{} for service {}", class.name(), method, id);
                class.invoke_instance_factory(receiver.as_ref(), method, arguments)
            }
            Value::String(name) => {
                tracing::trace!("Invoking factory {}::{} for service {}", name, method, id);
                classes.get(&name)?.invoke_factory(method, arguments)
            }
            other => Err(ContainerError::invalid_definition(
                id,
                format!("factory provider must be a class name or a service, found {}", other.kind()),
            )),
        }
    }

    fn resolve_parameter(&mut self, key: &str) -> Result<Value> {
        let argument = match self.parameters.get(key) {
            Some(Parameter::Resolved(value)) => return Ok(value.clone()),
            Some(Parameter::Pending(argument)) => argument.clone(),
            None => return Err(ContainerError::parameter_not_found(key)),
        };

        if self.resolving_parameters.contains(key) {
            return Err(self.resolving_parameters.cycle_error(key));
        }

        self.resolving_parameters.push(key);
        let resolved = Resolver::new(self).resolve(&argument);
        self.resolving_parameters.pop();

        let value = resolved?;
        if let Some(slot) = self.parameters.get_mut(key) {
            *slot = Parameter::Resolved(value.clone());
        }
        Ok(value)
    }
}

impl ReferenceLookup for Container {
    fn service(&mut self, id: &str) -> Result<Instance> {
        self.get_or_create(id)
    }

    fn parameter(&mut self, name: &str) -> Result<Value> {
        self.resolve_parameter(name)
    }

    fn env(&mut self, var: &str) -> Result<Value> {
        if let Some(value) = self.env.get(var) {
            return Ok(value.clone());
        }

        let value = match EnvCache::read_process(var) {
            Some(raw) => Value::String(raw),
            None => {
                let fallback = EnvCache::fallback_parameter(var);
                if self.has_parameter(&fallback) {
                    self.resolve_parameter(&fallback)?
                } else {
                    Value::Null
                }
            }
        };

        tracing::debug!("Environment variable {} resolved to a {}", var, value.kind());
        self.env.insert(var, value.clone());
        Ok(value)
    }
}

impl ServiceInjector for Container {
    fn has_definition(&self, id: &str) -> bool {
        Container::has_definition(self, id)
    }

    fn inject(&mut self, id: &str) -> Result<Instance> {
        self.get_or_create(id)
    }

    fn is_instance_of(&self, instance: &Instance, class: &str) -> bool {
        self.classes
            .find(class)
            .map_or(false, |descriptor| descriptor.type_id() == (**instance).type_id())
    }
}
