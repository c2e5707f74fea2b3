//! # Module Sources
//!
//! Implementations of [`ModuleSource`]:
//!
//! - [`MapSource`]: factories registered by hand
//! - [`InventorySource`]: factories registered with `#[component]`
//!   (feature `inventory`)

use futures::{FutureExt, future};
use std::{collections::HashMap, fmt};
use tessera_core::{BoxError, BoxFuture, FactoryRef, ModuleSource};
use thiserror::Error;

/// A module that no source provides.
#[derive(Debug, Clone, Error)]
#[error("module `{module}` is not available")]
pub struct MissingModule {
    /// The requested module.
    pub module: String,
}

/// A source serving factories from two maps: the bundle (eager types) and
/// the fetchable modules (lazy types). Both are keyed by element name.
///
/// # Example
///
/// ```rust,ignore
/// let source = MapSource::new()
///     .with_bundled(Arc::new(EntitiesCard))
///     .with_module(Arc::new(GaugeCard));
/// ```
#[derive(Clone, Default)]
pub struct MapSource {
    bundle: HashMap<String, FactoryRef>,
    modules: HashMap<String, FactoryRef>,
}

impl MapSource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory to the bundle.
    pub fn with_bundled(mut self, factory: FactoryRef) -> Self {
        self.insert_bundled(factory);
        self
    }

    /// Add a fetchable factory.
    pub fn with_module(mut self, factory: FactoryRef) -> Self {
        self.insert_module(factory);
        self
    }

    /// Add a factory to the bundle.
    pub fn insert_bundled(&mut self, factory: FactoryRef) {
        self.bundle.insert(factory.element().to_string(), factory);
    }

    /// Add a fetchable factory.
    pub fn insert_module(&mut self, factory: FactoryRef) {
        self.modules.insert(factory.element().to_string(), factory);
    }

    /// Number of bundled factories.
    pub fn bundled_count(&self) -> usize {
        self.bundle.len()
    }

    /// Number of fetchable factories.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl ModuleSource for MapSource {
    fn bundled(&self, element: &str) -> Option<FactoryRef> {
        self.bundle.get(element).cloned()
    }

    fn fetch(&self, module: &'static str) -> BoxFuture<'static, Result<FactoryRef, BoxError>> {
        let found = self.modules.get(module).cloned().ok_or_else(|| {
            BoxError::from(MissingModule {
                module: module.to_string(),
            })
        });
        future::ready(found).boxed()
    }
}

impl fmt::Debug for MapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bundle: Vec<_> = self.bundle.keys().collect();
        let mut modules: Vec<_> = self.modules.keys().collect();
        bundle.sort();
        modules.sort();
        f.debug_struct("MapSource")
            .field("bundle", &bundle)
            .field("modules", &modules)
            .finish()
    }
}

#[cfg(feature = "inventory")]
mod collected {
    use super::MapSource;
    use std::{collections::HashSet, sync::Arc};
    use tessera_core::{BoxError, BoxFuture, ComponentFactory, FactoryRef, ModuleSource};

    /// Registration entry for a component in the global registry.
    ///
    /// This struct is submitted to `inventory` by the `#[component]` macro.
    pub struct ComponentRegistration {
        /// Element name the component is registered under.
        pub element: &'static str,
        /// The component's factory.
        pub factory: &'static dyn ComponentFactory,
    }

    inventory::collect!(ComponentRegistration);

    /// A source serving every component registered through `inventory`.
    ///
    /// Registered components are both bundled and fetchable, so the same
    /// registration serves eager and lazy types. When an element is
    /// registered twice, the first registration seen wins.
    #[derive(Debug, Clone)]
    pub struct InventorySource {
        inner: MapSource,
    }

    impl InventorySource {
        /// Collect all registrations.
        pub fn collect() -> Self {
            let mut inner = MapSource::new();
            let mut seen = HashSet::new();
            for registration in inventory::iter::<ComponentRegistration>() {
                if !seen.insert(registration.element) {
                    tracing::warn!(element = registration.element, "duplicate component registration");
                    continue;
                }
                let factory: FactoryRef = Arc::new(registration.factory);
                inner.insert_bundled(factory.clone());
                inner.insert_module(factory);
            }
            tracing::debug!(components = seen.len(), "collected component registrations");
            Self { inner }
        }

        /// Number of registered components.
        pub fn len(&self) -> usize {
            self.inner.module_count()
        }

        /// Whether nothing is registered.
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Number of registrations in the binary, duplicates included.
        pub fn registration_count() -> usize {
            inventory::iter::<ComponentRegistration>().count()
        }
    }

    impl ModuleSource for InventorySource {
        fn bundled(&self, element: &str) -> Option<FactoryRef> {
            self.inner.bundled(element)
        }

        fn fetch(&self, module: &'static str) -> BoxFuture<'static, Result<FactoryRef, BoxError>> {
            self.inner.fetch(module)
        }
    }
}

#[cfg(feature = "inventory")]
pub use collected::{ComponentRegistration, InventorySource};
