//! Property sets forwarded to components.

use crate::key::TypeKey;
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

/// A raw configuration object: string keys to JSON-like values.
pub type Config = Map<String, Value>;

/// A localization function: translation key in, display string out.
pub type Localize = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Ambient state handed to every component untouched.
///
/// The dispatcher never interprets the context. `show_advanced` is carried as
/// a plain flag for components that gate optional behavior on it.
#[derive(Clone, Default)]
pub struct RenderContext {
    state: Arc<Value>,
    show_advanced: bool,
    localize: Option<Localize>,
    extras: Config,
}

impl RenderContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live entity/device state snapshot.
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Arc::new(state);
        self
    }

    /// Set the advanced-mode flag.
    pub fn with_show_advanced(mut self, show_advanced: bool) -> Self {
        self.show_advanced = show_advanced;
        self
    }

    /// Set the localization function.
    pub fn with_localize<F>(mut self, localize: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.localize = Some(Arc::new(localize));
        self
    }

    /// Attach an extra value (feature flags, form context, ...).
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// The live state snapshot.
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// Whether advanced mode is on.
    pub fn show_advanced(&self) -> bool {
        self.show_advanced
    }

    /// Translate `key`, or return it unchanged when no localizer is set.
    pub fn localize(&self, key: &str) -> String {
        match &self.localize {
            Some(localize) => localize(key),
            None => key.to_string(),
        }
    }

    /// Extra values.
    pub fn extras(&self) -> &Config {
        &self.extras
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("state", &self.state)
            .field("show_advanced", &self.show_advanced)
            .field("localize", &self.localize.as_ref().map(|_| ".."))
            .field("extras", &self.extras)
            .finish()
    }
}

/// The property set a component is constructed or updated with.
///
/// Every field of the caller's config reaches the component except the
/// consumed discriminant: for keyed domains the value under the key becomes
/// [`Props::options`], everything else stays in [`Props::config`].
#[derive(Debug, Clone)]
pub struct Props {
    key: TypeKey,
    options: Value,
    config: Config,
    context: RenderContext,
}

impl Props {
    /// Assemble a property set.
    pub fn new(key: TypeKey, options: Value, config: Config, context: RenderContext) -> Self {
        Self {
            key,
            options,
            config,
            context,
        }
    }

    /// The resolved type.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Options carried under a keyed discriminant (`Null` for field domains).
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// The remaining config fields.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Look up one config field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.config.get(field)
    }

    /// The ambient context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Config and options as one JSON value, for components that just echo
    /// what they were given.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::String(self.key.to_string()));
        if !self.options.is_null() {
            out.insert("options".into(), self.options.clone());
        }
        out.insert("config".into(), Value::Object(self.config.clone()));
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_localize_falls_back_to_key() {
        let ctx = RenderContext::new();
        assert_eq!(ctx.localize("ui.card.light"), "ui.card.light");

        let ctx = ctx.with_localize(|key| format!("<{key}>"));
        assert_eq!(ctx.localize("ui.card.light"), "<ui.card.light>");
    }

    #[test]
    fn test_props_to_value() {
        let mut config = Config::new();
        config.insert("name".into(), json!("Kitchen"));
        let props = Props::new(
            TypeKey::new("device"),
            json!({ "multiple": true }),
            config,
            RenderContext::new().with_show_advanced(true),
        );

        assert_eq!(props.get("name"), Some(&json!("Kitchen")));
        assert!(props.context().show_advanced());
        assert_eq!(
            props.to_value(),
            json!({
                "type": "device",
                "options": { "multiple": true },
                "config": { "name": "Kitchen" }
            })
        );
    }
}
