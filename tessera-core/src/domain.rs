//! Dispatch domains.
//!
//! Every polymorphic configuration object belongs to exactly one domain, and
//! a [`TypeKey`](crate::TypeKey) is only unique within its domain: `"entity"`
//! names both a selector and a card.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a domain keeps the discriminant of a raw config object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminant {
    /// The top-level key of the object names the type: `{ "device": { ... } }`.
    Key,
    /// A string field names the type: `{ "type": "gauge" }`.
    Field(&'static str),
    /// The type is derived from the entity domain of an entity-id field:
    /// `{ "entity_id": "light.kitchen" }` names the `light` control.
    EntityDomain(&'static str),
}

impl Discriminant {
    /// Whether the dispatcher consumes the discriminant instead of forwarding it.
    ///
    /// Derived discriminants are never consumed: the component still needs
    /// the entity id.
    pub const fn is_consumed(self) -> bool {
        !matches!(self, Discriminant::EntityDomain(_))
    }
}

/// A dispatch domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Form selectors (`ha-selector-*`).
    Selector,
    /// Dashboard cards (`hui-*-card`).
    Card,
    /// More-info dialog controls (`more-info-*`).
    MoreInfo,
    /// Tap/hold action editors (`hui-action-*-editor`).
    Action,
}

impl Domain {
    /// All domains, in a stable order.
    pub const ALL: [Domain; 4] = [
        Domain::Selector,
        Domain::Card,
        Domain::MoreInfo,
        Domain::Action,
    ];

    /// How this domain finds its discriminant.
    pub const fn discriminant(self) -> Discriminant {
        match self {
            Domain::Selector => Discriminant::Key,
            Domain::Card => Discriminant::Field("type"),
            Domain::MoreInfo => Discriminant::EntityDomain("entity_id"),
            Domain::Action => Discriminant::Field("action"),
        }
    }

    /// Stable lowercase name, used in logs and errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            Domain::Selector => "selector",
            Domain::Card => "card",
            Domain::MoreInfo => "more_info",
            Domain::Action => "action",
        }
    }

    /// The element (module) name implementing `key` in this domain.
    pub fn element_name(self, key: &str) -> String {
        match self {
            Domain::Selector => format!("ha-selector-{key}"),
            Domain::Card => format!("hui-{key}-card"),
            Domain::MoreInfo => format!("more-info-{key}"),
            Domain::Action => format!("hui-action-{key}-editor"),
        }
    }

    /// The element rendered in place of a config whose type cannot be
    /// resolved, if the domain designates one.
    pub const fn fallback_element(self) -> Option<&'static str> {
        match self {
            Domain::Card => Some("hui-error-card"),
            Domain::Selector | Domain::MoreInfo | Domain::Action => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_names() {
        assert_eq!(Domain::Selector.element_name("ui_action"), "ha-selector-ui_action");
        assert_eq!(Domain::Card.element_name("alarm-panel"), "hui-alarm-panel-card");
        assert_eq!(Domain::MoreInfo.element_name("climate"), "more-info-climate");
        assert_eq!(Domain::Action.element_name("navigate"), "hui-action-navigate-editor");
    }

    #[test]
    fn test_derived_discriminant_is_not_consumed() {
        assert!(Domain::Selector.discriminant().is_consumed());
        assert!(Domain::Card.discriminant().is_consumed());
        assert!(!Domain::MoreInfo.discriminant().is_consumed());
    }

    #[test]
    fn test_domain_serde_names() {
        let json = serde_json::to_string(&Domain::MoreInfo).unwrap();
        assert_eq!(json, "\"more_info\"");
        let back: Domain = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(back, Domain::Card);
    }
}
