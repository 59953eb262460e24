//! Integration tests for service construction, caching and visibility

mod common;

use common::*;
use rivet_core::container::FactoryRecord;
use rivet_core::{Container, ContainerBuilder, ContainerError, Definition, ServiceRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn create_container(lazy_loads: Arc<AtomicUsize>) -> Container {
    init_tracing();
    ContainerBuilder::new()
        .with_classes(classes(lazy_loads))
        .add_parameters(parameters("number: 42\n"))
        .add_records(records(SERVICES))
        .build_and_instantiate()
        .unwrap()
}

#[test]
fn test_eager_services_are_built() {
    let container = create_container(Arc::default());

    for id in ["baz", "foo", "bar", "private_service", "private_service_consumer", "foo_factory"] {
        assert!(container.has(id), "{} should have been built", id);
    }
    assert!(!container.has("lazy_load"));
    assert!(!container.has("foo_from_service_factory"));
}

#[test]
fn test_dependency_injection_shares_instances() {
    let mut container = create_container(Arc::default());

    let foo = container.get::<Foo>("foo").unwrap();
    let bar = container.get::<Bar>("bar").unwrap();
    assert!(Arc::ptr_eq(&foo.bar, &bar));
    assert_eq!(foo.number, 42);
    assert!(foo.flag);
}

#[test]
fn test_lazy_load() {
    let lazy_loads = Arc::new(AtomicUsize::new(0));
    let mut container = create_container(lazy_loads.clone());

    assert_eq!(lazy_loads.load(Ordering::SeqCst), 0);
    assert!(!container.has("lazy_load"));

    container.get::<LazyLoad>("lazy_load").unwrap();
    container.get::<LazyLoad>("lazy_load").unwrap();

    assert_eq!(lazy_loads.load(Ordering::SeqCst), 1);
    assert!(container.has("lazy_load"));
}

#[test]
fn test_method_call() {
    let mut container = create_container(Arc::default());
    assert!(container.get::<Foo>("foo").unwrap().baz);
}

#[test]
fn test_dependency_defined_after_definition() {
    let mut container = create_container(Arc::default());

    let baz = container.get::<Baz>("baz").unwrap();
    let foo = container.get::<Foo>("foo").unwrap();
    assert!(Arc::ptr_eq(&baz.foo, &foo));
}

#[test]
fn test_private_service() {
    let mut container = create_container(Arc::default());

    let consumer = container
        .get::<PrivateServiceConsumer>("private_service_consumer")
        .unwrap();
    let error = container.get::<PrivateService>("private_service").unwrap_err();
    assert!(error.is_service_not_public());

    // cached once, shared with the consumer
    assert!(container.has("private_service"));
    assert_eq!(Arc::strong_count(&consumer.private_service), 2);
}

#[test]
fn test_private_lazy_service_is_built_before_visibility_check() {
    let mut container = ContainerBuilder::new()
        .with_classes(classes(Arc::default()))
        .add_service(
            "hidden",
            Definition::for_class("PrivateService")
                .with_lazy(true)
                .with_public(false),
        )
        .build_and_instantiate()
        .unwrap();

    assert!(!container.has("hidden"));
    assert!(container.get::<PrivateService>("hidden").is_err());
    assert!(container.has("hidden"));
}

#[test]
fn test_static_factory() {
    let mut container = create_container(Arc::default());

    let foo = container.get::<Foo>("foo_from_factory").unwrap();
    let bar = container.get::<Bar>("bar").unwrap();
    assert!(Arc::ptr_eq(&foo.bar, &bar));
    assert_eq!(foo.number, 1);
}

#[test]
fn test_service_factory() {
    let mut container = create_container(Arc::default());

    let foo = container.get::<Foo>("foo_from_service_factory").unwrap();
    assert_eq!(foo.number, 7);
    assert!(!foo.flag);
}

#[test]
fn test_factory_product_method_calls() {
    let record: ServiceRecord = serde_yaml::from_str(
        "factory: 'FooFactory::createFoo'\narguments: ['@bar']\ncalls:\n  - method: setBaz\n    arguments: [true]\n",
    )
    .unwrap();
    assert_eq!(
        record.factory,
        Some(FactoryRecord::Joined("FooFactory::createFoo".to_string()))
    );

    let mut container = ContainerBuilder::new()
        .with_classes(classes(Arc::default()))
        .add_service("bar", Definition::for_class("Bar"))
        .add_record("foo", record)
        .build()
        .unwrap();

    let foo = container.get::<Foo>("foo").unwrap();
    assert!(foo.baz);
    assert_eq!(foo.number, 1);
}

#[test]
fn test_service_not_found() {
    let mut container = create_container(Arc::default());

    let error = container.get::<Bar>("noop").unwrap_err();
    assert!(error.is_service_not_found());
    assert!(!container.has_definition("noop"));
    assert!(container.has_definition("lazy_load"));
}

#[test]
fn test_unknown_reference_inside_arguments() {
    let result = ContainerBuilder::new()
        .with_classes(classes(Arc::default()))
        .add_service("baz", Definition::for_class("Baz").with_argument("@missing"))
        .build_and_instantiate();

    match result {
        Err(ContainerError::ServiceNotFound { service }) => assert_eq!(service, "missing"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_unknown_class() {
    let mut container = ContainerBuilder::new()
        .add_service("ghost", Definition::for_class("Ghost").with_lazy(true))
        .build()
        .unwrap();

    assert!(matches!(
        container.get::<Bar>("ghost"),
        Err(ContainerError::ClassNotFound { .. })
    ));
    assert!(!container.has("ghost"));
}

#[test]
fn test_arity_mismatch() {
    let mut container = ContainerBuilder::new()
        .with_classes(classes(Arc::default()))
        .add_service("bar", Definition::for_class("Bar"))
        .add_service(
            "foo",
            Definition::for_class("Foo")
                .with_argument("@bar")
                .with_lazy(true),
        )
        .build()
        .unwrap();

    match container.get::<Foo>("foo") {
        Err(ContainerError::ArityMismatch { expected, given, .. }) => {
            assert_eq!(expected, 3);
            assert_eq!(given, 1);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_constructor_failure_is_reported_and_not_cached() {
    let mut container = ContainerBuilder::new()
        .with_classes(classes(Arc::default()))
        .add_service(
            "mailer",
            Definition::for_class("Mailer").with_argument("").with_lazy(true),
        )
        .add_service(
            "smtp",
            Definition::for_class("Mailer")
                .with_argument("smtp://localhost")
                .with_lazy(true),
        )
        .build()
        .unwrap();

    match container.get::<Mailer>("mailer") {
        Err(ContainerError::ServiceConstruction { target, message }) => {
            assert_eq!(target, "Mailer::new");
            assert_eq!(message, "endpoint is empty");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!container.has("mailer"));

    let smtp = container.get::<Mailer>("smtp").unwrap();
    assert_eq!(smtp.endpoint, "smtp://localhost");
}

#[test]
fn test_cyclic_dependency() {
    let mut container = ContainerBuilder::new()
        .with_classes(classes(Arc::default()))
        .add_service("foo", Definition::for_class("Baz").with_argument("@baz").with_lazy(true))
        .add_service("baz", Definition::for_class("Baz").with_argument("@foo").with_lazy(true))
        .build()
        .unwrap();

    match container.get::<Baz>("foo") {
        Err(ContainerError::CyclicDependency { path, service }) => {
            assert_eq!(path, "foo -> baz -> foo");
            assert_eq!(service, "foo");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!container.has("foo"));
    assert!(!container.has("baz"));
}

#[test]
fn test_self_reference_is_a_cycle() {
    let mut container = ContainerBuilder::new()
        .with_classes(classes(Arc::default()))
        .add_service("baz", Definition::for_class("Baz").with_argument("@baz"))
        .build()
        .unwrap();

    let error = container.instantiate_services().unwrap_err();
    assert!(error.is_cyclic_dependency());
    assert!(!container.is_built());
}

#[test]
fn test_build_pass_runs_once() {
    let mut container = create_container(Arc::default());

    assert!(container.is_built());
    assert!(matches!(
        container.instantiate_services(),
        Err(ContainerError::ContainerBuilt { .. })
    ));
}

#[test]
fn test_service_ids_keep_registration_order() {
    let container = create_container(Arc::default());

    let ids: Vec<&str> = container.service_ids().collect();
    assert_eq!(&ids[..3], &["baz", "foo", "bar"]);
}
