//! More-info dialog controls.
//!
//! The control type is not written in the config: it is derived from the
//! domain of the entity the dialog is opened for.

use super::{DomainTable, EagerSet};
use phf::{phf_map, phf_set};
use tessera_core::Domain;

/// Control for entities without a dedicated one.
pub const DEFAULT_CONTROL: &str = "default";

/// Control for domains whose default control is not shown.
pub const HIDDEN_CONTROL: &str = "hidden";

/// Controls bundled with the dialog. Besides the two generic controls these
/// are the entity domains whose control ships with the dialog itself.
pub static BUNDLED_CONTROLS: phf::Set<&'static str> = phf_set! {
    "default",
    "hidden",
    "camera",
    "humidifier",
    "lawn_mower",
    "media_player",
    "person",
    "sun",
    "vacuum",
    "valve",
    "water_heater",
};

/// Entity domains whose default control is hidden.
pub static DOMAINS_HIDE_DEFAULT_MORE_INFO: phf::Set<&'static str> = phf_set! {
    "button",
    "input_button",
    "input_number",
    "input_select",
    "input_text",
    "number",
    "scene",
    "select",
    "text",
};

/// Entity domain to control module, for dedicated controls fetched on
/// demand.
pub static MORE_INFO_MODULES: phf::Map<&'static str, &'static str> = phf_map! {
    "alarm_control_panel" => "more-info-alarm_control_panel",
    "automation" => "more-info-automation",
    "climate" => "more-info-climate",
    "configurator" => "more-info-configurator",
    "counter" => "more-info-counter",
    "cover" => "more-info-cover",
    "date" => "more-info-date",
    "datetime" => "more-info-datetime",
    "fan" => "more-info-fan",
    "group" => "more-info-group",
    "image" => "more-info-image",
    "input_boolean" => "more-info-input_boolean",
    "input_datetime" => "more-info-input_datetime",
    "light" => "more-info-light",
    "lock" => "more-info-lock",
    "remote" => "more-info-remote",
    "script" => "more-info-script",
    "siren" => "more-info-siren",
    "switch" => "more-info-switch",
    "time" => "more-info-time",
    "timer" => "more-info-timer",
    "update" => "more-info-update",
    "weather" => "more-info-weather",
};

/// The control type for an entity domain.
pub fn domain_more_info_type(domain: &str) -> &'static str {
    if let Some((key, _)) = MORE_INFO_MODULES.get_entry(domain) {
        return *key;
    }
    if domain != DEFAULT_CONTROL && domain != HIDDEN_CONTROL {
        if let Some(key) = BUNDLED_CONTROLS.get_key(domain) {
            return *key;
        }
    }
    if DOMAINS_HIDE_DEFAULT_MORE_INFO.contains(domain) {
        return HIDDEN_CONTROL;
    }
    DEFAULT_CONTROL
}

/// The control type for an entity id (`light.kitchen` -> `light`).
///
/// Returns `None` for ids without a `<domain>.<object_id>` shape.
pub fn state_more_info_type(entity_id: &str) -> Option<&'static str> {
    match entity_id.split_once('.') {
        Some((domain, object_id)) if !domain.is_empty() && !object_id.is_empty() => {
            Some(domain_more_info_type(domain))
        }
        _ => None,
    }
}

/// The more-info domain.
pub static MORE_INFO: DomainTable = DomainTable::new(
    Domain::MoreInfo,
    EagerSet::new(&BUNDLED_CONTROLS),
    &MORE_INFO_MODULES,
)
.with_derive(domain_more_info_type);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_more_info_type() {
        assert_eq!(domain_more_info_type("light"), "light");
        assert_eq!(domain_more_info_type("input_select"), HIDDEN_CONTROL);
        assert_eq!(domain_more_info_type("sensor"), DEFAULT_CONTROL);
        assert_eq!(domain_more_info_type("camera"), "camera");
        assert_eq!(domain_more_info_type("water_heater"), "water_heater");
    }

    #[test]
    fn test_bundled_and_fetched_controls() {
        assert_eq!(MORE_INFO_MODULES.len(), 23);
        assert_eq!(BUNDLED_CONTROLS.len(), 11);

        for domain in ["camera", "media_player", "person", "sun", "vacuum"] {
            assert!(MORE_INFO.eager().is_eager(domain), "{domain}");
            assert_eq!(MORE_INFO.module(domain), None, "{domain}");
        }
        for domain in ["climate", "light", "weather"] {
            assert!(!MORE_INFO.eager().is_eager(domain), "{domain}");
            assert!(MORE_INFO.module(domain).is_some(), "{domain}");
        }
    }

    #[test]
    fn test_state_more_info_type() {
        assert_eq!(state_more_info_type("climate.living_room"), Some("climate"));
        assert_eq!(state_more_info_type("number.volume"), Some(HIDDEN_CONTROL));
        assert_eq!(state_more_info_type("binary_sensor.door"), Some(DEFAULT_CONTROL));
        assert_eq!(state_more_info_type("light"), None);
        assert_eq!(state_more_info_type(".kitchen"), None);
        assert_eq!(state_more_info_type("light."), None);
    }
}
