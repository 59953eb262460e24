use crate::config::ContainerConfig;
use crate::container::container::Container;
use crate::container::definition::Definition;
use crate::container::descriptor::{ClassDescriptor, ClassRegistry};
use crate::container::record::ServiceRecord;
use crate::errors::Result;
use crate::value::Value;
use indexmap::IndexMap;

/// A service as handed to the builder
#[derive(Debug, Clone)]
enum ServiceEntry {
    Record(ServiceRecord),
    Definition(Definition),
}

/// Builder for constructing containers from classes, parameters and services
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    classes: ClassRegistry,
    config: ContainerConfig,
    parameters: IndexMap<String, Value>,
    services: IndexMap<String, ServiceEntry>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given class registry
    pub fn with_classes(mut self, classes: ClassRegistry) -> Self {
        self.classes = classes;
        self
    }

    /// Register one more instantiable class
    pub fn add_class(mut self, descriptor: ClassDescriptor) -> Self {
        self.classes.register(descriptor);
        self
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Toggle constructor autowiring
    pub fn autowire(mut self, autowire: bool) -> Self {
        self.config = self.config.with_autowire(autowire);
        self
    }

    /// Add a raw parameter; it is resolved when the container is built
    pub fn add_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Add multiple raw parameters at once
    pub fn add_parameters(mut self, parameters: IndexMap<String, Value>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Add a service definition
    pub fn add_service(mut self, id: impl Into<String>, definition: Definition) -> Self {
        self.services
            .insert(id.into(), ServiceEntry::Definition(definition));
        self
    }

    /// Add a raw service record, validated when the container is built
    pub fn add_record(mut self, id: impl Into<String>, record: ServiceRecord) -> Self {
        self.services.insert(id.into(), ServiceEntry::Record(record));
        self
    }

    /// Add multiple raw service records at once
    pub fn add_records(mut self, records: IndexMap<String, ServiceRecord>) -> Self {
        for (id, record) in records {
            self.services.insert(id, ServiceEntry::Record(record));
        }
        self
    }

    /// Configure the builder from a configuration closure
    pub fn configure<F>(self, configure: F) -> Result<Self>
    where
        F: FnOnce(Self) -> Result<Self>,
    {
        configure(self)
    }

    /// Build the container
    ///
    /// Every service is validated before anything is registered. Services
    /// are registered before parameters are resolved, so a parameter may
    /// reference a service.
    pub fn build(self) -> Result<Container> {
        let mut definitions = Vec::with_capacity(self.services.len());
        for (id, entry) in self.services {
            let definition = match entry {
                ServiceEntry::Record(record) => Definition::from_record(&id, record)?,
                ServiceEntry::Definition(definition) => {
                    definition.validate(&id)?;
                    definition
                }
            };
            definitions.push((id, definition));
        }

        let mut container = Container::with_config(self.classes, &self.config);
        for (id, definition) in definitions {
            container.register(id, definition)?;
        }

        container.load_parameters(self.parameters)?;

        tracing::debug!(
            "Container assembled: {} services, {} parameters (autowire: {})",
            container.service_ids().count(),
            container.parameters().count(),
            self.config.autowire
        );
        Ok(container)
    }

    /// Build the container and run the build pass
    pub fn build_and_instantiate(self) -> Result<Container> {
        let mut container = self.build()?;
        container.instantiate_services()?;
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ContainerError;

    #[derive(Debug)]
    struct Mailer;

    fn classes() -> ClassRegistry {
        ClassRegistry::new().with(
            ClassDescriptor::builder::<Mailer>("Mailer")
                .constructor(|_| Ok(Mailer))
                .build(),
        )
    }

    #[test]
    fn test_container_builder() -> Result<()> {
        let container = ContainerBuilder::new()
            .with_classes(classes())
            .add_parameter("transport", "smtp")
            .add_service("mailer", Definition::for_class("Mailer"))
            .build_and_instantiate()?;

        assert!(container.has("mailer"));
        assert!(container.is_built());
        assert_eq!(container.get_parameter("transport")?, &Value::from("smtp"));
        Ok(())
    }

    #[test]
    fn test_invalid_record_prevents_any_registration() {
        let result = ContainerBuilder::new()
            .with_classes(classes())
            .add_service("mailer", Definition::for_class("Mailer"))
            .add_record("broken", ServiceRecord::default())
            .build();

        match result {
            Err(ContainerError::InvalidDefinition { service, .. }) => assert_eq!(service, "broken"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parameter_may_reference_service() -> Result<()> {
        let mut container = ContainerBuilder::new()
            .with_classes(classes())
            .add_parameter("mailer_ref", "@mailer")
            .add_service("mailer", Definition::for_class("Mailer").with_lazy(true))
            .build()?;

        let from_parameter = container.get_parameter("mailer_ref")?.as_service::<Mailer>();
        let from_container = container.get::<Mailer>("mailer")?;
        assert!(std::sync::Arc::ptr_eq(&from_parameter.unwrap(), &from_container));
        Ok(())
    }

    #[test]
    fn test_configure_closure() -> Result<()> {
        let container = ContainerBuilder::new()
            .autowire(true)
            .configure(|builder| Ok(builder.add_parameter("debug", true)))?
            .build()?;

        assert!(container.is_autowiring());
        assert_eq!(container.get_parameter_or("debug", false), Value::Bool(true));
        Ok(())
    }
}
