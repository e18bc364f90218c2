//! Conversion of the `[templates.*]` and `[[servers]]` sections into the
//! fleet model.

use crate::{ConfigError, ConfigErrorResult};

use std::path::Path;

use sm_core::{Fields, Fleet, ServerEntry, ServerTemplate};
use toml::{Table, Value};

/// Build a fleet snapshot from raw TOML tables.
///
/// Field order follows declaration order in the file. Values may be strings,
/// integers, floats or booleans.
pub fn build_fleet(
    templates: &Table,
    servers: &[Table],
    base_dir: &Path,
) -> ConfigErrorResult<Fleet> {
    let templates = templates
        .iter()
        .map(|(name, value)| {
            let table = value.as_table().ok_or_else(|| {
                ConfigError::invalid(format!("templates.{name}"), "must be a table")
            })?;
            let fields = to_fields(&format!("templates.{name}"), table)?;
            Ok(ServerTemplate::new(name.clone(), fields))
        })
        .collect::<ConfigErrorResult<Vec<_>>>()?;

    let entries = servers
        .iter()
        .enumerate()
        .map(|(index, table)| {
            let fields = to_fields(&format!("servers[{index}]"), table)?;
            Ok(ServerEntry::new(fields)?)
        })
        .collect::<ConfigErrorResult<Vec<_>>>()?;

    Ok(Fleet::new(templates, entries, base_dir))
}

fn to_fields(section: &str, table: &Table) -> ConfigErrorResult<Fields> {
    table
        .iter()
        .map(|(key, value)| Ok((key.clone(), scalar_to_string(section, key, value)?)))
        .collect()
}

fn scalar_to_string(section: &str, key: &str, value: &Value) -> ConfigErrorResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        other => Err(ConfigError::invalid(
            format!("{section}.\"{key}\""),
            format!("must be a string, number or boolean, got {}", other.type_str()),
        )),
    }
}
