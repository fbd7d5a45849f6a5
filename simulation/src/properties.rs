use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File, Value, ValueKind};

use crate::error::{Error, Result};

/// Raw string lookups by property key, e.g. `simulation.start`
pub trait PropertySource {
    /// The value of `key`, if defined. A key holding something other than a single value is an error.
    fn get_optional_property(&self, key: &str) -> Result<Option<String>>;

    /// The boolean value of `key`, or `default` when it is not defined
    fn get_boolean(&self, key: &str, default: bool) -> Result<bool> {
        match self.get_optional_property(key)? {
            None => Ok(default),
            Some(v) => parse_bool(key, &v),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::InvalidBoolean {
            value: value.to_string(),
            property: key.to_string(),
        }),
    }
}

impl PropertySource for HashMap<String, String> {
    fn get_optional_property(&self, key: &str) -> Result<Option<String>> { Ok(self.get(key).cloned()) }
}

impl PropertySource for HashMap<&str, &str> {
    fn get_optional_property(&self, key: &str) -> Result<Option<String>> { Ok(self.get(key).map(ToString::to_string)) }
}

/// Keys are paths, `simulation.trade.fees` is read from `simulation: { trade: { fees: .. } }`.
/// Tables and arrays are rejected, booleans and numbers are read as their text.
impl PropertySource for Config {
    fn get_optional_property(&self, key: &str) -> Result<Option<String>> {
        match self.get::<Value>(key) {
            Ok(v) => match &v.kind {
                ValueKind::Nil => Ok(None),
                ValueKind::Table(_) | ValueKind::Array(_) => Err(Error::NotAValue {
                    value: v.to_string(),
                    property: key.to_string(),
                }),
                _ => Ok(Some(v.into_string()?)),
            },
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Loads a yaml, toml or json file, overridden by `TRADER_` prefixed environment variables
/// (`TRADER_SIMULATION_START` overrides `simulation.start`)
pub fn load_config(config_file_name: &str) -> Result<Config> {
    let config = Config::builder()
        .add_source(File::with_name(config_file_name))
        .add_source(Environment::with_prefix("TRADER").separator("_"))
        .set_override("__config_file", config_file_name)?
        .build()?;
    Ok(config)
}
