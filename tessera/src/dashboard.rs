//! The four dispatchers of a dashboard.

use futures::channel::mpsc::UnboundedSender;
use std::sync::Arc;
use tessera_core::{Domain, LoaderConfig, ModuleSource, Spawner};
use tessera_std::{DispatchSite, Dispatcher, LazyLoader, SiteId};

/// One dispatcher per domain, sharing a module source and a spawner.
///
/// Built once at startup; every dispatch site of the dashboard borrows its
/// dispatcher from here, so each type is loaded at most once per dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    selectors: Arc<Dispatcher>,
    cards: Arc<Dispatcher>,
    more_info: Arc<Dispatcher>,
    actions: Arc<Dispatcher>,
}

impl Dashboard {
    /// A dashboard with default loader settings.
    pub fn new(source: Arc<dyn ModuleSource>, spawner: Arc<dyn Spawner>) -> Self {
        Self::with_config(source, spawner, LoaderConfig::default())
    }

    /// A dashboard whose loaders share `config`.
    pub fn with_config(
        source: Arc<dyn ModuleSource>,
        spawner: Arc<dyn Spawner>,
        config: LoaderConfig,
    ) -> Self {
        let build = |domain: Domain| {
            let loader = LazyLoader::for_domain(domain, source.clone(), spawner.clone())
                .with_config(config.clone());
            Arc::new(Dispatcher::new(loader))
        };

        let dashboard = Self {
            selectors: build(Domain::Selector),
            cards: build(Domain::Card),
            more_info: build(Domain::MoreInfo),
            actions: build(Domain::Action),
        };
        tracing::debug!(retry = ?config.retry, "dashboard ready");
        dashboard
    }

    /// A dashboard serving every component registered with `#[component]`.
    #[cfg(feature = "inventory")]
    pub fn from_inventory(spawner: Arc<dyn Spawner>) -> Self {
        Self::new(Arc::new(tessera_std::InventorySource::collect()), spawner)
    }

    /// The dispatcher of a domain.
    pub fn dispatcher(&self, domain: Domain) -> &Arc<Dispatcher> {
        match domain {
            Domain::Selector => &self.selectors,
            Domain::Card => &self.cards,
            Domain::MoreInfo => &self.more_info,
            Domain::Action => &self.actions,
        }
    }

    /// The selector dispatcher.
    pub fn selectors(&self) -> &Arc<Dispatcher> {
        &self.selectors
    }

    /// The card dispatcher.
    pub fn cards(&self) -> &Arc<Dispatcher> {
        &self.cards
    }

    /// The more-info dispatcher.
    pub fn more_info(&self) -> &Arc<Dispatcher> {
        &self.more_info
    }

    /// The action dispatcher.
    pub fn actions(&self) -> &Arc<Dispatcher> {
        &self.actions
    }

    /// A new dispatch site of `domain` reporting to `notify`.
    pub fn site(&self, domain: Domain, notify: UnboundedSender<SiteId>) -> DispatchSite {
        DispatchSite::new(self.dispatcher(domain).clone(), notify)
    }
}
