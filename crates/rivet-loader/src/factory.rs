use crate::document::{ConfigDocument, Format};
use crate::error::LoaderResult;
use rivet_core::{ClassRegistry, Container, ContainerBuilder, ContainerConfig};
use std::path::Path;

/// Builds ready-to-use containers from service documents
///
/// The returned container has already run its build pass.
#[derive(Debug)]
pub struct ContainerFactory {
    classes: ClassRegistry,
    config: ContainerConfig,
}

impl ContainerFactory {
    pub fn new(classes: ClassRegistry) -> Self {
        Self {
            classes,
            config: ContainerConfig::default(),
        }
    }

    /// Settings used when the document has no `autowire` key
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load `path` with its imports, build the container and instantiate eager services
    pub fn create(self, path: impl AsRef<Path>) -> LoaderResult<Container> {
        let path = path.as_ref();
        let document = ConfigDocument::load(path)?;
        self.from_document(document, &path.display().to_string())
    }

    /// Same as [`create`](Self::create) for an in-memory document
    pub fn from_str(self, source: &str, format: Format) -> LoaderResult<Container> {
        let document = ConfigDocument::from_str(source, format)?;
        self.from_document(document, "<memory>")
    }

    pub fn from_document(self, document: ConfigDocument, origin: &str) -> LoaderResult<Container> {
        let config = match document.autowire {
            Some(autowire) => ContainerConfig::from_document(autowire, origin),
            None => self.config,
        };

        tracing::info!(
            "Creating container from {}: {} services, {} parameters",
            origin,
            document.services.len(),
            document.parameters.len()
        );

        let container = ContainerBuilder::new()
            .with_classes(self.classes)
            .with_config(config)
            .add_records(document.services)
            .add_parameters(document.parameters)
            .build_and_instantiate()?;
        Ok(container)
    }
}
