//! Raw service records as handed over by a configuration source

use crate::value::Value;
use serde::Deserialize;

/// One entry of a `services` mapping
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRecord {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub factory: Option<FactoryRecord>,
    #[serde(default)]
    pub lazy: bool,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(default)]
    pub arguments: Vec<Value>,
    #[serde(default)]
    pub calls: Vec<CallRecord>,
}

impl Default for ServiceRecord {
    fn default() -> Self {
        Self {
            class: None,
            factory: None,
            lazy: false,
            public: true,
            arguments: Vec::new(),
            calls: Vec::new(),
        }
    }
}

fn default_public() -> bool {
    true
}

/// `factory: "Class:method"` or `factory: [provider, method]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FactoryRecord {
    Joined(String),
    Pair(String, String),
}

/// One entry of a service's `calls` list
#[derive(Debug, Clone, Deserialize)]
pub struct CallRecord {
    pub method: String,
    #[serde(default)]
    pub arguments: Vec<Value>,
}
