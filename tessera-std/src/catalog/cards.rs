//! Dashboard cards.

use super::{DomainTable, EagerSet};
use phf::{phf_map, phf_set};
use tessera_core::Domain;

/// Cards bundled with the dashboard.
pub static ALWAYS_LOADED_CARDS: phf::Set<&'static str> = phf_set! {
    "entity",
    "entities",
    "button",
    "entity-button",
    "glance",
    "grid",
    "section",
    "light",
    "sensor",
    "thermostat",
    "weather-forecast",
    "tile",
};

/// Card type to module.
pub static CARD_MODULES: phf::Map<&'static str, &'static str> = phf_map! {
    "alarm-panel" => "hui-alarm-panel-card",
    "area" => "hui-area-card",
    "calendar" => "hui-calendar-card",
    "conditional" => "hui-conditional-card",
    "empty-state" => "hui-empty-state-card",
    "entity-filter" => "hui-entity-filter-card",
    "error" => "hui-error-card",
    "gauge" => "hui-gauge-card",
    "history-graph" => "hui-history-graph-card",
    "horizontal-stack" => "hui-horizontal-stack-card",
    "iframe" => "hui-iframe-card",
    "logbook" => "hui-logbook-card",
    "map" => "hui-map-card",
    "markdown" => "hui-markdown-card",
    "picture-elements" => "hui-picture-elements-card",
    "picture-entity" => "hui-picture-entity-card",
    "picture-glance" => "hui-picture-glance-card",
    "picture" => "hui-picture-card",
    "plant-status" => "hui-plant-status-card",
    "recovery-mode" => "hui-recovery-mode-card",
    "todo-list" => "hui-todo-list-card",
    "shopping-list" => "hui-shopping-list-card",
    "starting" => "hui-starting-card",
    "statistics-graph" => "hui-statistics-graph-card",
    "statistic" => "hui-statistic-card",
    "vertical-stack" => "hui-vertical-stack-card",
};

/// The card domain.
pub static CARDS: DomainTable = DomainTable::new(
    Domain::Card,
    EagerSet::new(&ALWAYS_LOADED_CARDS),
    &CARD_MODULES,
);
