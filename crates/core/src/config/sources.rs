/// Where the container's autowire setting was taken from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Named environment variable
    EnvVar(String),
    #[default]
    Default,
    /// Service document at the given path
    File(String),
    /// Set through the builder API
    Programmatic,
}
