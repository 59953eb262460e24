//! Service documents for the rivet container
//!
//! Reads YAML or JSON documents with `parameters`, `services`, an optional
//! `autowire` flag and `imports` of further documents, then hands the merged
//! result to [`rivet_core::ContainerBuilder`].

pub mod document;
pub mod error;
pub mod factory;

pub use document::{ConfigDocument, Format, Import};
pub use error::{LoaderError, LoaderResult};
pub use factory::ContainerFactory;
