//! # Dynamic Dispatch
//!
//! A [`Dispatcher`] turns a raw config into something renderable: it
//! resolves the type, makes sure the module is loaded, and builds the
//! component with the resolved properties. Every failure degrades into a
//! [`Rendered`] value; nothing propagates past [`Dispatcher::render`].
//!
//! Dispatchers are stateless. A [`DispatchSite`] binds one to a place in the
//! rendering tree, owns the live component and re-renders once a pending
//! load settles.

mod site;

pub use site::{DispatchSite, SiteId, SitePhase, rerender_channel};

use crate::{
    loader::{LazyLoader, LoadHandle},
    resolve::{Resolved, Resolver},
};
use serde_json::Value;
use std::{fmt, sync::Arc};
use tessera_core::{
    Component, Domain, FactoryRef, LoadError, Loadable, Props, RenderContext, ResolveError,
    TesseraError, TypeKey,
};

/// The output of one dispatch.
#[derive(Debug, Clone)]
pub enum Rendered {
    /// The module is loading; nothing to show yet.
    Placeholder {
        /// The pending type.
        key: TypeKey,
    },

    /// The component rendered.
    Ready {
        /// The rendered type.
        key: TypeKey,
        /// Element name of the component.
        element: String,
        /// The component's view.
        view: Value,
    },

    /// The config could not be resolved, or its type has no loader.
    Fallback {
        /// Domain of the dispatcher.
        domain: Domain,
        /// The domain's fallback element, if it has one.
        element: Option<&'static str>,
        /// What went wrong.
        error: TesseraError,
    },

    /// The module of a known type failed to load.
    Failed {
        /// The failed type.
        key: TypeKey,
        /// The domain's fallback element, if it has one.
        element: Option<&'static str>,
        /// The load failure.
        error: LoadError,
    },
}

impl Rendered {
    /// Whether the component rendered.
    pub fn is_ready(&self) -> bool {
        matches!(self, Rendered::Ready { .. })
    }

    /// Whether a load is pending.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Rendered::Placeholder { .. })
    }

    /// Whether this is a fallback or failure rendering.
    pub fn is_error(&self) -> bool {
        matches!(self, Rendered::Fallback { .. } | Rendered::Failed { .. })
    }

    /// The view of a ready component.
    pub fn view(&self) -> Option<&Value> {
        match self {
            Rendered::Ready { view, .. } => Some(view),
            _ => None,
        }
    }
}

/// First half of a dispatch: everything up to, but excluding, the component.
pub(crate) enum Begin {
    Fallback(TesseraError),
    Loaded { props: Props, factory: FactoryRef },
    Loading { props: Props, handle: LoadHandle },
    Failed { key: TypeKey, error: LoadError },
}

/// Resolves, loads and renders the configs of one domain.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::new(LazyLoader::for_domain(Domain::Card, source, spawner));
///
/// match dispatcher.render(&json!({ "type": "gauge", "entity": "sensor.power" }), &ctx) {
///     Rendered::Ready { view, .. } => draw(view),
///     Rendered::Placeholder { .. } => draw_nothing(),
///     other => draw_error(other),
/// }
/// ```
pub struct Dispatcher {
    resolver: Resolver,
    loader: LazyLoader,
}

impl Dispatcher {
    /// A dispatcher over the domain of `loader`.
    pub fn new(loader: LazyLoader) -> Self {
        Self {
            resolver: Resolver::new(loader.table()),
            loader,
        }
    }

    /// Domain of the dispatched configs.
    pub fn domain(&self) -> Domain {
        self.loader.domain()
    }

    /// The type resolver.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// The lazy loader.
    pub fn loader(&self) -> &LazyLoader {
        &self.loader
    }

    /// Resolve a raw config without loading anything.
    pub fn resolve(&self, raw: &Value) -> Result<Resolved, ResolveError> {
        self.resolver.resolve(raw)
    }

    /// Render a raw config once.
    ///
    /// A ready type gets a fresh component instance. A pending load renders a
    /// placeholder and nobody is notified when it settles; use a
    /// [`DispatchSite`] for that.
    pub fn render(&self, raw: &Value, context: &RenderContext) -> Rendered {
        match self.begin(raw, context, None) {
            Begin::Fallback(error) => self.fallback(error),
            Begin::Failed { key, error } => self.failed(key, error),
            Begin::Loading { props, .. } => Rendered::Placeholder {
                key: props.key().clone(),
            },
            Begin::Loaded { props, factory } => {
                let key = props.key().clone();
                let component = factory.create(props);
                Rendered::Ready {
                    key,
                    element: factory.element().to_string(),
                    view: component.render(),
                }
            }
        }
    }

    /// Start loading the type of a raw config without rendering it.
    ///
    /// Resolution and loader errors are logged and swallowed.
    pub fn preload(&self, raw: &Value) -> Option<LoadHandle> {
        let resolved = match self.resolver.resolve(raw) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::debug!(domain = %self.domain(), error = %err, "nothing to preload");
                return None;
            }
        };
        match self.loader.ensure_loaded(resolved.key()) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::debug!(domain = %self.domain(), error = %err, "nothing to preload");
                None
            }
        }
    }

    /// Wait for the module of a raw config and build its component.
    pub async fn try_create(
        &self,
        raw: &Value,
        context: &RenderContext,
    ) -> Result<Box<dyn Component>, TesseraError> {
        let resolved = self.resolver.resolve(raw)?;
        let factory = self.loader.load(resolved.key()).await?;
        Ok(factory.create(resolved.into_props(context.clone())))
    }

    /// Wait for the factory of a type.
    pub async fn factory(&self, key: &str) -> Result<FactoryRef, TesseraError> {
        let key = self.resolver.canonical_key(key);
        Ok(self.loader.load(&key).await?)
    }

    // A settled `watched` load of the same type is used as is, so a failed
    // load is reported instead of being started again.
    pub(crate) fn begin(
        &self,
        raw: &Value,
        context: &RenderContext,
        watched: Option<&LoadHandle>,
    ) -> Begin {
        let resolved = match self.resolver.resolve(raw) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(domain = %self.domain(), error = %err, "unresolved config");
                return Begin::Fallback(err.into());
            }
        };

        let handle = match watched {
            Some(handle) if handle.key() == resolved.key() && handle.is_ready() => handle.clone(),
            _ => match self.loader.ensure_loaded(resolved.key()) {
                Ok(handle) => handle,
                Err(err) => return Begin::Fallback(err.into()),
            },
        };

        match handle.result() {
            Some(Ok(factory)) => Begin::Loaded {
                props: resolved.into_props(context.clone()),
                factory,
            },
            Some(Err(error)) => Begin::Failed {
                key: resolved.key().clone(),
                error,
            },
            None => Begin::Loading {
                props: resolved.into_props(context.clone()),
                handle,
            },
        }
    }

    pub(crate) fn fallback(&self, error: TesseraError) -> Rendered {
        Rendered::Fallback {
            domain: self.domain(),
            element: self.domain().fallback_element(),
            error,
        }
    }

    pub(crate) fn failed(&self, key: TypeKey, error: LoadError) -> Rendered {
        Rendered::Failed {
            key,
            element: self.domain().fallback_element(),
            error,
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("domain", &self.domain())
            .field("loader", &self.loader)
            .finish()
    }
}

impl From<LazyLoader> for Dispatcher {
    fn from(loader: LazyLoader) -> Self {
        Self::new(loader)
    }
}

/// Shared handle to a dispatcher.
pub type DispatcherRef = Arc<Dispatcher>;
