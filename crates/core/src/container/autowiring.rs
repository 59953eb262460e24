use crate::container::descriptor::ParameterSpec;
use crate::errors::Result;
use crate::value::{Instance, Value};

/// Trait for supplying services to the autowirer
///
/// Injection bypasses visibility: private services can be autowired.
pub trait ServiceInjector {
    /// Whether a definition is registered under `id`
    fn has_definition(&self, id: &str) -> bool;

    /// Get or create the service registered under `id`
    fn inject(&mut self, id: &str) -> Result<Instance>;

    /// Whether `instance` is of the Rust type registered for `class`
    fn is_instance_of(&self, instance: &Instance, class: &str) -> bool;
}

/// Fills constructor parameters a definition did not supply explicitly
///
/// Walks the constructor signature left to right. Every class-hinted
/// position whose class name is also a registered service id, and which is
/// not already holding a service, receives that service, spliced in at the
/// parameter's index. A position holding a service of some other class is
/// not covered. Primitive and untyped positions are never filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autowirer;

impl Autowirer {
    pub fn new() -> Self {
        Self
    }

    pub fn fill_missing_arguments<I: ServiceInjector + ?Sized>(
        &self,
        signature: &[ParameterSpec],
        mut arguments: Vec<Value>,
        injector: &mut I,
    ) -> Result<Vec<Value>> {
        if arguments.len() >= signature.len() {
            return Ok(arguments);
        }

        for (index, parameter) in signature.iter().enumerate() {
            if arguments.len() >= signature.len() {
                break;
            }

            let Some(class) = parameter.class_hint() else {
                continue;
            };

            if let Some(Value::Service(instance)) = arguments.get(index) {
                if injector.is_instance_of(instance, class) {
                    continue;
                }
            }

            if !injector.has_definition(class) {
                continue;
            }

            tracing::debug!(
                "Autowiring service '{}' into parameter '{}' (#{})",
                class,
                parameter.name,
                index
            );
            let instance = injector.inject(class)?;
            let position = index.min(arguments.len());
            arguments.insert(position, Value::Service(instance));
        }

        Ok(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::descriptor::Primitive;
    use crate::errors::ContainerError;
    use std::any::{Any, TypeId};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct Bar;
    struct Logger;

    // Mock injector for testing
    #[derive(Default)]
    struct MockInjector {
        services: HashMap<String, Instance>,
        types: HashMap<String, TypeId>,
        injected: Vec<String>,
    }

    impl MockInjector {
        fn register<T: Send + Sync + 'static>(&mut self, id: &str, instance: T) -> Instance {
            let instance: Instance = Arc::new(instance);
            self.types.insert(id.to_string(), TypeId::of::<T>());
            self.services.insert(id.to_string(), instance.clone());
            instance
        }
    }

    impl ServiceInjector for MockInjector {
        fn has_definition(&self, id: &str) -> bool {
            self.services.contains_key(id)
        }

        fn inject(&mut self, id: &str) -> Result<Instance> {
            self.injected.push(id.to_string());
            self.services
                .get(id)
                .cloned()
                .ok_or_else(|| ContainerError::service_not_found(id))
        }

        fn is_instance_of(&self, instance: &Instance, class: &str) -> bool {
            self.types
                .get(class)
                .map_or(false, |type_id| (**instance).type_id() == *type_id)
        }
    }

    fn foo_signature() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::class("bar", "Bar"),
            ParameterSpec::primitive("number", Primitive::Int),
            ParameterSpec::primitive("bool", Primitive::Bool),
        ]
    }

    #[test]
    fn test_splices_service_at_parameter_index() {
        let mut injector = MockInjector::default();
        let bar = injector.register("Bar", Bar);

        let arguments = Autowirer::new()
            .fill_missing_arguments(
                &foo_signature(),
                vec![Value::Int(1), Value::Bool(true)],
                &mut injector,
            )
            .unwrap();

        assert_eq!(
            arguments,
            vec![Value::Service(bar), Value::Int(1), Value::Bool(true)]
        );
        assert_eq!(injector.injected, vec!["Bar".to_string()]);
    }

    #[test]
    fn test_complete_arguments_are_untouched() {
        let mut injector = MockInjector::default();
        injector.register("Bar", Bar);
        let explicit = Value::service(Arc::new(Bar));

        let arguments = Autowirer::new()
            .fill_missing_arguments(
                &foo_signature(),
                vec![explicit.clone(), Value::Int(1), Value::Bool(true)],
                &mut injector,
            )
            .unwrap();

        assert_eq!(arguments[0], explicit);
        assert!(injector.injected.is_empty());
    }

    #[test]
    fn test_unregistered_and_primitive_hints_are_left_unfilled() {
        let mut injector = MockInjector::default();

        let arguments = Autowirer::new()
            .fill_missing_arguments(&foo_signature(), vec![Value::Int(1)], &mut injector)
            .unwrap();

        assert_eq!(arguments, vec![Value::Int(1)]);
        assert!(injector.injected.is_empty());
    }

    #[test]
    fn test_multiple_services_keep_explicit_order() {
        let mut injector = MockInjector::default();
        let bar = injector.register("Bar", Bar);
        let logger = injector.register("Logger", Logger);

        let signature = vec![
            ParameterSpec::class("bar", "Bar"),
            ParameterSpec::primitive("name", Primitive::String),
            ParameterSpec::class("logger", "Logger"),
            ParameterSpec::untyped("extra"),
        ];

        let arguments = Autowirer::new()
            .fill_missing_arguments(
                &signature,
                vec![Value::from("app"), Value::Int(9)],
                &mut injector,
            )
            .unwrap();

        assert_eq!(
            arguments,
            vec![
                Value::Service(bar),
                Value::from("app"),
                Value::Service(logger),
                Value::Int(9),
            ]
        );
    }

    #[test]
    fn test_service_of_other_class_does_not_cover_position() {
        let mut injector = MockInjector::default();
        let bar = injector.register("Bar", Bar);
        let logger = injector.register("Logger", Logger);

        let signature = vec![
            ParameterSpec::class("bar", "Bar"),
            ParameterSpec::class("logger", "Logger"),
        ];

        let arguments = Autowirer::new()
            .fill_missing_arguments(
                &signature,
                vec![Value::Service(logger.clone())],
                &mut injector,
            )
            .unwrap();

        assert_eq!(arguments, vec![Value::Service(bar), Value::Service(logger)]);
        assert_eq!(injector.injected, vec!["Bar".to_string()]);
    }

    #[test]
    fn test_explicit_service_counts_as_covered() {
        let mut injector = MockInjector::default();
        injector.register("Bar", Bar);
        let explicit = Value::service(Arc::new(Bar));

        let arguments = Autowirer::new()
            .fill_missing_arguments(
                &foo_signature(),
                vec![explicit.clone(), Value::Int(1)],
                &mut injector,
            )
            .unwrap();

        assert_eq!(arguments, vec![explicit, Value::Int(1)]);
        assert!(injector.injected.is_empty());
    }
}
