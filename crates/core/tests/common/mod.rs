//! Fixture classes shared by the integration tests

#![allow(dead_code)]

use indexmap::IndexMap;
use rivet_core::container::ServiceRecord;
use rivet_core::{ClassDescriptor, ClassRegistry, ContainerError, Primitive, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct Bar;

#[derive(Debug)]
pub struct Foo {
    pub bar: Arc<Bar>,
    pub number: i64,
    pub flag: bool,
    pub baz: bool,
}

impl Foo {
    pub fn new(bar: Arc<Bar>, number: i64, flag: bool) -> Self {
        Self {
            bar,
            number,
            flag,
            baz: false,
        }
    }
}

#[derive(Debug)]
pub struct Baz {
    pub foo: Arc<Foo>,
}

#[derive(Debug)]
pub struct LazyLoad;

#[derive(Debug)]
pub struct PrivateService;

#[derive(Debug)]
pub struct PrivateServiceConsumer {
    pub private_service: Arc<PrivateService>,
}

#[derive(Debug)]
pub struct Logger;

#[derive(Debug)]
pub struct Notifier {
    pub bar: Arc<Bar>,
    pub logger: Arc<Logger>,
}

/// Constructor refuses an empty endpoint
#[derive(Debug)]
pub struct Mailer {
    pub endpoint: String,
}

#[derive(Debug)]
pub struct FooFactory {
    pub number: i64,
}

/// Install a test subscriber so `RUST_LOG`-style output shows up on failure
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Registry of every fixture class; `lazy_loads` counts `LazyLoad` constructions
pub fn classes(lazy_loads: Arc<AtomicUsize>) -> ClassRegistry {
    ClassRegistry::new()
        .with(
            ClassDescriptor::builder::<Bar>("Bar")
                .constructor(|_| Ok(Bar))
                .build(),
        )
        .with(
            ClassDescriptor::builder::<Foo>("Foo")
                .class_param("bar", "Bar")
                .primitive_param("number", Primitive::Int)
                .primitive_param("bool", Primitive::Bool)
                .constructor(|args| Ok(Foo::new(args.service::<Bar>(0)?, args.int(1)?, args.bool(2)?)))
                .method("setBaz", |foo: &mut Foo, args| {
                    foo.baz = args.bool(0)?;
                    Ok(())
                })
                .build(),
        )
        .with(
            ClassDescriptor::builder::<Baz>("Baz")
                .class_param("foo", "Foo")
                .constructor(|args| Ok(Baz { foo: args.service::<Foo>(0)? }))
                .build(),
        )
        .with(
            ClassDescriptor::builder::<LazyLoad>("LazyLoad")
                .constructor(move |_| {
                    lazy_loads.fetch_add(1, Ordering::SeqCst);
                    Ok(LazyLoad)
                })
                .build(),
        )
        .with(
            ClassDescriptor::builder::<PrivateService>("PrivateService")
                .constructor(|_| Ok(PrivateService))
                .build(),
        )
        .with(
            ClassDescriptor::builder::<PrivateServiceConsumer>("PrivateServiceConsumer")
                .class_param("privateService", "PrivateService")
                .constructor(|args| {
                    Ok(PrivateServiceConsumer {
                        private_service: args.service::<PrivateService>(0)?,
                    })
                })
                .build(),
        )
        .with(
            ClassDescriptor::builder::<Logger>("Logger")
                .constructor(|_| Ok(Logger))
                .build(),
        )
        .with(
            ClassDescriptor::builder::<Notifier>("Notifier")
                .class_param("bar", "Bar")
                .class_param("logger", "Logger")
                .constructor(|args| {
                    Ok(Notifier {
                        bar: args.service::<Bar>(0)?,
                        logger: args.service::<Logger>(1)?,
                    })
                })
                .build(),
        )
        .with(
            ClassDescriptor::builder::<Mailer>("Mailer")
                .primitive_param("endpoint", Primitive::String)
                .constructor(|args| {
                    let endpoint = args.string(0)?;
                    if endpoint.is_empty() {
                        return Err(ContainerError::construction("Mailer::new", "endpoint is empty"));
                    }
                    Ok(Mailer { endpoint })
                })
                .build(),
        )
        .with(
            ClassDescriptor::builder::<FooFactory>("FooFactory")
                .primitive_param("number", Primitive::Int)
                .constructor(|args| Ok(FooFactory { number: args.int(0)? }))
                .factory("createFoo", |args| -> Result<Foo> {
                    Ok(Foo::new(args.service::<Bar>(0)?, 1, true))
                })
                .instance_factory("build", |factory: &FooFactory, args| -> Result<Foo> {
                    Ok(Foo::new(args.service::<Bar>(0)?, factory.number, false))
                })
                .build(),
        )
}

/// Parse a YAML `services` mapping into raw records
pub fn records(yaml: &str) -> IndexMap<String, ServiceRecord> {
    serde_yaml::from_str(yaml).unwrap()
}

/// Parse a YAML `parameters` mapping into raw values
pub fn parameters(yaml: &str) -> IndexMap<String, rivet_core::Value> {
    serde_yaml::from_str(yaml).unwrap()
}

pub const SERVICES: &str = r#"
baz:
  class: Baz
  arguments: ['@foo']
foo:
  class: Foo
  arguments: ['@bar', '%number%', true]
  calls:
    - method: setBaz
      arguments: [true]
bar:
  class: Bar
lazy_load:
  class: LazyLoad
  lazy: true
private_service:
  class: PrivateService
  public: false
private_service_consumer:
  class: PrivateServiceConsumer
  arguments: ['@private_service']
foo_from_factory:
  factory: 'FooFactory:createFoo'
  arguments: ['@bar']
foo_factory:
  class: FooFactory
  arguments: [7]
foo_from_service_factory:
  factory: ['@foo_factory', build]
  arguments: ['@bar']
  lazy: true
"#;
