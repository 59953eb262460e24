//! Example: wiring a small object graph from an in-memory YAML document
//!
//! Run with `RUST_LOG=debug` to see services being created.

use rivet_core::{ClassDescriptor, ClassRegistry, Primitive, Result};
use rivet_loader::{ContainerFactory, Format};
use std::sync::Arc;

const DOCUMENT: &str = r#"
autowire: true
parameters:
  env(MAILER_DSN): 'smtp://localhost:25'
  mailer_dsn: '%env(MAILER_DSN)%'
  sender: 'noreply@%domain%'
  domain: example.com
services:
  Transport:
    class: Transport
    arguments: ['%mailer_dsn%']
    public: false
  mailer:
    class: Mailer
    arguments: ['%sender%']
    calls:
      - method: setRetries
        arguments: [3]
"#;

struct Transport {
    dsn: String,
}

struct Mailer {
    transport: Arc<Transport>,
    sender: String,
    retries: i64,
}

impl Mailer {
    fn send(&self, to: &str) {
        println!(
            "{} -> {} via {} ({} retries)",
            self.sender, to, self.transport.dsn, self.retries
        );
    }
}

fn classes() -> ClassRegistry {
    ClassRegistry::new()
        .with(
            ClassDescriptor::builder::<Transport>("Transport")
                .primitive_param("dsn", Primitive::String)
                .constructor(|args| Ok(Transport { dsn: args.string(0)? }))
                .build(),
        )
        .with(
            ClassDescriptor::builder::<Mailer>("Mailer")
                .class_param("transport", "Transport")
                .primitive_param("sender", Primitive::String)
                .constructor(|args| {
                    Ok(Mailer {
                        transport: args.service::<Transport>(0)?,
                        sender: args.string(1)?,
                        retries: 0,
                    })
                })
                .method("setRetries", |mailer: &mut Mailer, args| {
                    mailer.retries = args.int(0)?;
                    Ok(())
                })
                .build(),
        )
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut container = ContainerFactory::new(classes()).from_str(DOCUMENT, Format::Yaml)?;

    let mailer: Arc<Mailer> = container.get("mailer")?;
    mailer.send("user@example.com");

    let missing: Result<Arc<Transport>> = container.get("Transport");
    if let Err(error) = missing {
        println!("{}", error);
    }

    Ok(())
}
