//! Legacy config shapes.
//!
//! Older dashboards wrote filter fields directly on the `entity` and `device`
//! selector options, and called services through `service`/`service_data`.
//! Each rewrite relocates fields; none is dropped. An object that already
//! has the canonical shape passes through untouched.

use serde_json::{Map, Value};
use tessera_core::Config;

const ENTITY_FILTER_FIELDS: [&str; 3] = ["domain", "integration", "device_class"];
const DEVICE_FILTER_FIELDS: [&str; 3] = ["integration", "manufacturer", "model"];

/// A selector whose options may still use a legacy shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacySelector {
    Entity,
    Device,
}

impl LegacySelector {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "entity" => Some(LegacySelector::Entity),
            "device" => Some(LegacySelector::Device),
            _ => None,
        }
    }

    fn filter_fields(self) -> &'static [&'static str] {
        match self {
            LegacySelector::Entity => &ENTITY_FILTER_FIELDS,
            LegacySelector::Device => &DEVICE_FILTER_FIELDS,
        }
    }
}

/// Rewrite the options of a selector into their canonical shape.
pub fn normalize_selector_options(key: &str, options: Value) -> Value {
    match LegacySelector::from_key(key) {
        Some(legacy) => nest_filter(options, legacy.filter_fields()),
        None => options,
    }
}

fn nest_filter(options: Value, fields: &[&str]) -> Value {
    let Value::Object(mut object) = options else {
        return options;
    };
    if object.contains_key("filter") {
        return Value::Object(object);
    }

    let mut filter = Map::new();
    for field in fields {
        if let Some(value) = object.remove(*field) {
            filter.insert((*field).to_string(), value);
        }
    }
    if !filter.is_empty() {
        object.insert("filter".to_string(), Value::Object(filter));
    }
    Value::Object(object)
}

/// Rewrite the legacy service fields of a `perform-action` action.
pub fn normalize_action_fields(config: &mut Config) {
    let performs = matches!(config.get("action"), Some(Value::String(action)) if action == "perform-action");
    if !performs {
        return;
    }
    relocate(config, "service", "perform_action");
    relocate(config, "service_data", "data");
}

// The canonical field wins; a legacy field next to it stays where it is.
fn relocate(config: &mut Config, from: &str, to: &str) {
    if config.contains_key(to) {
        return;
    }
    if let Some(value) = config.remove(from) {
        config.insert(to.to_string(), value);
    }
}
