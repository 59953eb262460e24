#[allow(clippy::module_inception)]
pub mod container;
pub mod builder;
pub mod aware;
pub mod arguments;
pub mod autowiring;
pub mod definition;
pub mod descriptor;
pub mod env;
pub mod record;
pub mod reference;
pub mod resolver;

pub use container::Container;
pub use builder::ContainerBuilder;
pub use aware::ContainerAware;
pub use arguments::Arguments;
pub use autowiring::{Autowirer, ServiceInjector};
pub use definition::{Definition, Factory, MethodCall};
pub use descriptor::{
    ClassDescriptor, ClassDescriptorBuilder, ClassRegistry, Object, ParameterSpec, Primitive,
    TypeHint,
};
pub use env::EnvCache;
pub use record::{CallRecord, FactoryRecord, ServiceRecord};
pub use reference::{Argument, ParameterRef, Segment};
pub use resolver::{ReferenceLookup, ResolutionPath, Resolver};
