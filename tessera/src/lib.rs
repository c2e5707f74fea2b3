//! # tessera - Lazy Component Registry
//!
//! `tessera` resolves polymorphic dashboard configs (selectors, cards,
//! more-info controls, actions) to their components, loading each
//! component's module the first time its type is seen.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera::prelude::*;
//!
//! let dashboard = Dashboard::new(source, Arc::new(|task| { tokio::spawn(task); }));
//!
//! let (notify, mut rerender) = rerender_channel();
//! let mut site = dashboard.site(Domain::Selector, notify);
//!
//! site.render(&json!({ "device": { "integration": "hue" } }), &ctx); // Placeholder
//! rerender.next().await;
//! site.refresh(); // Ready
//! ```
//!
//! Nothing below the dispatcher panics or propagates: unresolved configs,
//! unknown types and failed loads all come back as a [`Rendered`] value.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dashboard;

pub use dashboard::Dashboard;

pub use tessera_core::{
    // Errors
    BoxError,
    BoxFuture,
    // Components
    Component,
    ComponentFactory,
    // Props
    Config,
    // Domains
    Discriminant,
    Domain,
    FactoryRef,
    LoadError,
    // Loading
    LoadOutcome,
    LoadState,
    Loadable,
    // Configuration
    LoaderConfig,
    LoaderError,
    Localize,
    // Sources
    ModuleSource,
    Props,
    RenderContext,
    ResolveError,
    RetryPolicy,
    SharedError,
    Spawner,
    TesseraError,
    // Keys
    TypeKey,
    UnresolvedReason,
    normalize_key,
};

pub use tessera_std::{
    DispatchSite, Dispatcher, DispatcherRef, DomainTable, EagerSet, EntryStatus, LazyLoader,
    LoadHandle, MapSource, Registry, Rendered, Resolved, Resolver, SiteId, SitePhase,
    rerender_channel,
};

#[cfg(feature = "tokio")]
pub use tessera_std::TokioSpawner;

pub use tessera_std::{catalog, dispatch, loader, resolve, source};

pub use serde_json::Value;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use tessera_std::testing::*;
}

/// Prelude module - common imports for Tessera.
///
/// # Usage
///
/// ```rust,ignore
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Component, ComponentFactory, Dashboard, DispatchSite, Dispatcher, Domain, Loadable,
        LoaderConfig, ModuleSource, Props, RenderContext, Rendered, RetryPolicy, SitePhase,
        Spawner, TesseraError, TypeKey, rerender_channel,
    };
}

#[cfg(feature = "macros")]
pub use tessera_macros::component;

#[cfg(feature = "inventory")]
pub use inventory;

#[cfg(feature = "inventory")]
pub use tessera_std::{ComponentRegistration, InventorySource};
