//! Tap/hold action editors.
//!
//! Actions without options (toggle, more-info, ...) have trivial editors that
//! are bundled; the ones with a sub-form are lazy.

use super::{DomainTable, EagerSet};
use phf::{phf_map, phf_set};
use tessera_core::Domain;

/// Action editors bundled with the dashboard.
pub static BUNDLED_ACTIONS: phf::Set<&'static str> = phf_set! {
    "more-info",
    "toggle",
    "assist",
    "none",
};

/// Deprecated action names.
pub static ACTION_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "call-service" => "perform-action",
};

/// Action type to editor module.
pub static ACTION_MODULES: phf::Map<&'static str, &'static str> = phf_map! {
    "navigate" => "hui-action-navigate-editor",
    "url" => "hui-action-url-editor",
    "perform-action" => "hui-action-perform-action-editor",
};

/// The action domain.
pub static ACTIONS: DomainTable = DomainTable::new(
    Domain::Action,
    EagerSet::new(&BUNDLED_ACTIONS),
    &ACTION_MODULES,
)
.with_aliases(&ACTION_ALIASES);
