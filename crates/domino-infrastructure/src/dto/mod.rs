//! Persisted representations of domain models.
//!
//! DTOs isolate the on-disk layout from the domain types. Every record carries
//! a `version` key and is loaded through a `version_migrate::Migrator`, so a
//! record written by an unknown schema is rejected instead of misread.

mod session;

pub use session::{
    ACTIVE_SESSION_ENTITY, ActiveSessionV1_0_0, HISTORY_ENTRY_ENTITY, HistoryEntryV1_0_0,
    HistoryLogDocument, create_active_session_migrator, create_history_entry_migrator,
    load_active_session, store_active_session, store_history_entry,
};

use domino_core::DominoError;
use domino_core::error::Result;

/// Converts the JSON produced by `Migrator::save_domain_flat` into TOML.
///
/// TOML has no null, so null object members are dropped. Optional DTO fields
/// are `#[serde(default)]` and read back as `None`.
fn json_to_toml(json: &serde_json::Value) -> Result<toml::Value> {
    match json {
        serde_json::Value::Null => Err(DominoError::Serialization {
            format: "TOML".to_string(),
            message: "null outside of a table".to_string(),
        }),
        serde_json::Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(toml::Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(toml::Value::Float(f))
            } else {
                Err(DominoError::Serialization {
                    format: "TOML".to_string(),
                    message: format!("Unsupported JSON number: {}", n),
                })
            }
        }
        serde_json::Value::String(s) => Ok(toml::Value::String(s.clone())),
        serde_json::Value::Array(arr) => {
            let toml_arr: Result<Vec<toml::Value>> = arr.iter().map(json_to_toml).collect();
            Ok(toml::Value::Array(toml_arr?))
        }
        serde_json::Value::Object(obj) => {
            let mut toml_map = toml::map::Map::new();
            for (k, v) in obj.iter().filter(|(_, v)| !v.is_null()) {
                toml_map.insert(k.clone(), json_to_toml(v)?);
            }
            Ok(toml::Value::Table(toml_map))
        }
    }
}

fn flat_json_to_toml(json_str: &str) -> Result<toml::Value> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    json_to_toml(&json_value)
}
