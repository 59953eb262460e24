//! Process-wide named constants, referenced from configuration as
//! `%constant(NAME)%`.
//!
//! The namespace starts with a handful of Rust built-ins and grows through
//! [`define`]. A name can be defined once; later definitions are ignored.

use crate::errors::{ContainerError, Result};
use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;

static CONSTANTS: Lazy<RwLock<HashMap<String, Value>>> = Lazy::new(|| RwLock::new(builtins()));

fn builtins() -> HashMap<String, Value> {
    let mut constants = HashMap::new();
    constants.insert("i64::MAX".to_string(), Value::Int(i64::MAX));
    constants.insert("i64::MIN".to_string(), Value::Int(i64::MIN));
    constants.insert("f64::consts::PI".to_string(), Value::Float(std::f64::consts::PI));
    constants.insert("f64::consts::E".to_string(), Value::Float(std::f64::consts::E));
    constants.insert("std::env::consts::OS".to_string(), Value::from(std::env::consts::OS));
    constants.insert("std::env::consts::ARCH".to_string(), Value::from(std::env::consts::ARCH));
    constants.insert(
        "std::env::consts::FAMILY".to_string(),
        Value::from(std::env::consts::FAMILY),
    );
    constants.insert(
        "std::path::MAIN_SEPARATOR".to_string(),
        Value::from(std::path::MAIN_SEPARATOR),
    );
    constants
}

/// Define a constant. Returns `false` if the name was already defined.
pub fn define(name: impl Into<String>, value: impl Into<Value>) -> Result<bool> {
    let mut constants = CONSTANTS.write().map_err(|_| ContainerError::LockError {
        resource: "constants".to_string(),
    })?;

    let name = name.into();
    if constants.contains_key(&name) {
        return Ok(false);
    }

    tracing::debug!("Defining constant: {}", name);
    constants.insert(name, value.into());
    Ok(true)
}

/// Look up a constant by name
pub fn lookup(name: &str) -> Result<Option<Value>> {
    let constants = CONSTANTS.read().map_err(|_| ContainerError::LockError {
        resource: "constants".to_string(),
    })?;
    Ok(constants.get(name).cloned())
}

/// Look up a constant, failing when it is not defined
pub fn get(name: &str) -> Result<Value> {
    lookup(name)?.ok_or_else(|| ContainerError::ConstantNotFound {
        name: name.to_string(),
    })
}

pub fn is_defined(name: &str) -> bool {
    CONSTANTS
        .read()
        .map(|constants| constants.contains_key(name))
        .unwrap_or(false)
}
