//! # Type Resolution
//!
//! Turns a raw config object into a canonical [`TypeKey`] plus the property
//! payload, in three steps:
//!
//! 1. **Locate** the discriminant the way the domain stores it.
//! 2. **Canonicalize** the key: trim, lowercase, rewrite legacy aliases.
//! 3. **Normalize** the config: legacy shapes are rewritten into the
//!    canonical nested shape, relocating fields without dropping any.
//!
//! Resolution never consults the loader. A well-formed key that has no
//! registry entry resolves fine and is reported later as
//! [`LoaderError::UnknownType`](tessera_core::LoaderError::UnknownType).

pub mod legacy;

use crate::catalog::{self, DomainTable};
use serde_json::Value;
use tessera_core::{
    Config, Discriminant, Domain, Props, RenderContext, ResolveError, TypeKey, UnresolvedReason,
    normalize_key,
};

/// A config split into its type and the payload forwarded to the component.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    key: TypeKey,
    options: Value,
    config: Config,
}

impl Resolved {
    /// The canonical type.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Options found under a keyed discriminant (`Null` otherwise).
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// The remaining, normalized config fields.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merge with the ambient context into the component's property set.
    pub fn into_props(self, context: RenderContext) -> Props {
        Props::new(self.key, self.options, self.config, context)
    }
}

/// Resolves raw configs of one domain.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    table: &'static DomainTable,
}

impl Resolver {
    /// A resolver over a static domain table.
    pub const fn new(table: &'static DomainTable) -> Self {
        Self { table }
    }

    /// The resolver of a built-in domain.
    pub fn for_domain(domain: Domain) -> Self {
        Self::new(catalog::table(domain))
    }

    /// The domain being resolved.
    pub fn domain(&self) -> Domain {
        self.table.domain()
    }

    /// Canonicalize a discriminant string. Idempotent.
    pub fn canonical_key(&self, raw: &str) -> TypeKey {
        let normalized = normalize_key(raw);
        match self.table.alias(&normalized) {
            Some(canonical) => TypeKey::new(canonical),
            None => TypeKey::new(normalized),
        }
    }

    /// The canonical type of a raw config.
    pub fn discriminant(&self, raw: &Config) -> Result<TypeKey, ResolveError> {
        self.locate(raw).map(|(_, key)| key)
    }

    /// Resolve a raw config value.
    pub fn resolve(&self, raw: &Value) -> Result<Resolved, ResolveError> {
        match raw {
            Value::Object(config) => self.resolve_config(config),
            _ => Err(self.unresolved(UnresolvedReason::NotAnObject)),
        }
    }

    /// Resolve a raw config object.
    pub fn resolve_config(&self, raw: &Config) -> Result<Resolved, ResolveError> {
        let (_, key) = self.locate(raw)?;
        let mut config = self.normalize(raw);

        let discriminant = self.domain().discriminant();
        let options = match discriminant {
            Discriminant::Key => config.remove(key.as_str()).unwrap_or(Value::Null),
            Discriminant::Field(field) | Discriminant::EntityDomain(field) => {
                if discriminant.is_consumed() {
                    config.remove(field);
                }
                Value::Null
            }
        };

        tracing::debug!(domain = %self.domain(), key = %key, "resolved config");
        Ok(Resolved {
            key,
            options,
            config,
        })
    }

    /// Rewrite a raw config into its canonical shape.
    ///
    /// Total and idempotent: configs without a discriminant come back
    /// unchanged, and normalizing twice is the same as normalizing once.
    pub fn normalize(&self, raw: &Config) -> Config {
        let mut out = raw.clone();
        let Ok((raw_key, key)) = self.locate(raw) else {
            return out;
        };

        match self.domain().discriminant() {
            Discriminant::Key => {
                if let Some(raw_key) = raw_key {
                    // When both spellings are present the canonical one wins.
                    if raw_key != key.as_str() && !raw.contains_key(key.as_str()) {
                        if let Some(options) = out.remove(raw_key) {
                            out.insert(key.to_string(), options);
                        }
                    }
                }
                if let Some(options) = out.remove(key.as_str()) {
                    out.insert(
                        key.to_string(),
                        legacy::normalize_selector_options(&key, options),
                    );
                }
            }
            Discriminant::Field(field) => {
                out.insert(field.to_string(), Value::String(key.to_string()));
                if self.domain() == Domain::Action {
                    legacy::normalize_action_fields(&mut out);
                }
            }
            Discriminant::EntityDomain(_) => {}
        }
        out
    }

    // Returns the raw top-level key that carried the discriminant (keyed
    // domains only) together with the canonical key.
    fn locate<'a>(&self, raw: &'a Config) -> Result<(Option<&'a str>, TypeKey), ResolveError> {
        match self.domain().discriminant() {
            Discriminant::Key => {
                if raw.is_empty() {
                    return Err(self.unresolved(UnresolvedReason::Empty));
                }
                let table = self.table;
                let picked = raw
                    .keys()
                    .find(|k| table.contains(&normalize_key(k)))
                    .or_else(|| {
                        raw.keys().find(|k| {
                            table
                                .alias(&normalize_key(k))
                                .is_some_and(|canonical| table.contains(canonical))
                        })
                    })
                    .or_else(|| raw.keys().find(|k| !normalize_key(k).is_empty()));

                match picked {
                    Some(raw_key) => Ok((Some(raw_key.as_str()), self.canonical_key(raw_key))),
                    None => Err(self.unresolved(UnresolvedReason::Blank("key"))),
                }
            }
            Discriminant::Field(field) => {
                let value = self.string_field(raw, field)?;
                let key = self.canonical_key(value);
                if key.is_empty() {
                    return Err(self.unresolved(UnresolvedReason::Blank(field)));
                }
                Ok((None, key))
            }
            Discriminant::EntityDomain(field) => {
                let entity_id = self.string_field(raw, field)?;
                let domain = match entity_id.trim().split_once('.') {
                    Some((domain, object_id)) if !domain.is_empty() && !object_id.is_empty() => {
                        normalize_key(domain)
                    }
                    _ => {
                        return Err(self.unresolved(UnresolvedReason::MalformedEntityId(
                            entity_id.to_string(),
                        )));
                    }
                };
                let key = match self.table.derive(&domain) {
                    Some(derived) => TypeKey::new(derived),
                    None => self.canonical_key(&domain),
                };
                Ok((None, key))
            }
        }
    }

    fn string_field<'a>(&self, raw: &'a Config, field: &'static str) -> Result<&'a str, ResolveError> {
        match raw.get(field) {
            None | Some(Value::Null) => Err(self.unresolved(UnresolvedReason::MissingField(field))),
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(self.unresolved(UnresolvedReason::NotAString(field))),
        }
    }

    fn unresolved(&self, reason: UnresolvedReason) -> ResolveError {
        tracing::debug!(domain = %self.domain(), %reason, "unresolved config");
        ResolveError::UnresolvedType {
            domain: self.domain(),
            reason,
        }
    }
}
