//! Form selectors.
//!
//! Every selector is lazy: the form renders a placeholder until the selector
//! module for the type arrives.

use super::{DomainTable, EagerSet};
use phf::phf_map;
use tessera_core::Domain;

/// Deprecated hyphenated selector keys.
pub static SELECTOR_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "ui-action" => "ui_action",
    "ui-color" => "ui_color",
};

/// Selector type to module.
pub static SELECTOR_MODULES: phf::Map<&'static str, &'static str> = phf_map! {
    "action" => "ha-selector-action",
    "area" => "ha-selector-area",
    "area_filter" => "ha-selector-area_filter",
    "attribute" => "ha-selector-attribute",
    "boolean" => "ha-selector-boolean",
    "color_rgb" => "ha-selector-color_rgb",
    "condition" => "ha-selector-condition",
    "config_entry" => "ha-selector-config_entry",
    "constant" => "ha-selector-constant",
    "country" => "ha-selector-country",
    "date" => "ha-selector-date",
    "datetime" => "ha-selector-datetime",
    "device" => "ha-selector-device",
    "duration" => "ha-selector-duration",
    "entity" => "ha-selector-entity",
    "statistic" => "ha-selector-statistic",
    "file" => "ha-selector-file",
    "floor" => "ha-selector-floor",
    "label" => "ha-selector-label",
    "image" => "ha-selector-image",
    "language" => "ha-selector-language",
    "navigation" => "ha-selector-navigation",
    "number" => "ha-selector-number",
    "object" => "ha-selector-object",
    "qr_code" => "ha-selector-qr_code",
    "select" => "ha-selector-select",
    "selector" => "ha-selector-selector",
    "state" => "ha-selector-state",
    "target" => "ha-selector-target",
    "template" => "ha-selector-template",
    "text" => "ha-selector-text",
    "time" => "ha-selector-time",
    "icon" => "ha-selector-icon",
    "theme" => "ha-selector-theme",
    "trigger" => "ha-selector-trigger",
    "location" => "ha-selector-location",
    "color_temp" => "ha-selector-color_temp",
    "ui_action" => "ha-selector-ui_action",
    "ui_color" => "ha-selector-ui_color",
    "ui_state_content" => "ha-selector-ui_state_content",
};

/// The selector domain.
pub static SELECTORS: DomainTable =
    DomainTable::new(Domain::Selector, EagerSet::none(), &SELECTOR_MODULES)
        .with_aliases(&SELECTOR_ALIASES);
