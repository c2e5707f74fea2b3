//! # Lazy Loading
//!
//! The registry maps every lazily loaded type of a domain to its module and
//! memoizes the load. At most one fetch per key is in flight at any time;
//! every concurrent request shares it.
//!
//! ```text
//!            ensure_loaded(key)
//!                   │
//!       ┌───────────┼─────────────────┐
//!     eager       lazy              unknown
//!       │           │                 │
//!    bundle     Unloaded ──fetch──▶ Loading ──▶ Loaded
//!                   ▲                  │
//!                   └── Reattempt ── Failed (Sticky: stays)
//! ```
//!
//! Loads run on the configured [`Spawner`], so a load keeps going even when
//! every handle on it has been dropped.

use crate::catalog::{self, DomainTable};
use futures::{FutureExt, future::Shared};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    task::{Context, Poll},
    time::Duration,
};
use tessera_core::{
    BoxError, BoxFuture, Domain, FactoryRef, LoadError, LoadOutcome, LoadState, Loadable,
    LoaderConfig, LoaderError, ModuleSource, RetryPolicy, Spawner, TypeKey,
};

type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

// ============================================================================
// Registry
// ============================================================================

/// Observable status of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Never requested.
    Unloaded,
    /// A fetch is in flight.
    Loading,
    /// The module is available.
    Loaded,
    /// The last fetch failed.
    Failed,
}

enum EntryState {
    Unloaded,
    Loading(SharedLoad),
    Loaded(FactoryRef),
    Failed(LoadError),
}

impl EntryState {
    fn status(&self) -> EntryStatus {
        match self {
            EntryState::Unloaded => EntryStatus::Unloaded,
            EntryState::Loading(_) => EntryStatus::Loading,
            EntryState::Loaded(_) => EntryStatus::Loaded,
            EntryState::Failed(_) => EntryStatus::Failed,
        }
    }
}

struct LoaderEntry {
    key: TypeKey,
    module: &'static str,
    state: Mutex<EntryState>,
    attempts: AtomicUsize,
}

impl LoaderEntry {
    fn new(key: &'static str, module: &'static str) -> Self {
        Self {
            key: TypeKey::new(key),
            module,
            state: Mutex::new(EntryState::Unloaded),
            attempts: AtomicUsize::new(0),
        }
    }
}

/// The lazily loaded types of one domain, fixed at construction.
pub struct Registry {
    domain: Domain,
    entries: HashMap<&'static str, Arc<LoaderEntry>>,
}

impl Registry {
    /// One unloaded entry per lazy type of the table.
    pub fn from_table(table: &DomainTable) -> Self {
        let entries = table
            .modules()
            .map(|(key, module)| (key, Arc::new(LoaderEntry::new(key, module))))
            .collect();
        Self {
            domain: table.domain(),
            entries,
        }
    }

    /// Domain of the registered types.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Whether `key` has an entry.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Module of a registered key.
    pub fn module(&self, key: &str) -> Option<&'static str> {
        self.entries.get(key).map(|entry| entry.module)
    }

    /// Current status of a registered key.
    pub fn status(&self, key: &str) -> Option<EntryStatus> {
        self.entries.get(key).map(|entry| entry.state.lock().status())
    }

    /// How many fetches were started for `key`.
    pub fn attempts(&self, key: &str) -> usize {
        self.entries
            .get(key)
            .map_or(0, |entry| entry.attempts.load(Ordering::Relaxed))
    }

    fn entry(&self, key: &str) -> Option<&Arc<LoaderEntry>> {
        self.entries.get(key)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("domain", &self.domain)
            .field("entries", &self.entries.len())
            .finish()
    }
}

// ============================================================================
// Load Handle
// ============================================================================

/// A handle on the load of one type.
///
/// Eager types and settled loads produce an already-settled handle; an
/// in-flight load produces a handle sharing that load with every other
/// requester.
#[derive(Clone)]
pub struct LoadHandle {
    key: TypeKey,
    inner: HandleInner,
}

#[derive(Clone)]
enum HandleInner {
    Settled(LoadOutcome),
    Pending(SharedLoad),
}

impl LoadHandle {
    fn settled(key: TypeKey, outcome: LoadOutcome) -> Self {
        Self {
            key,
            inner: HandleInner::Settled(outcome),
        }
    }

    fn pending(key: TypeKey, load: SharedLoad) -> Self {
        Self {
            key,
            inner: HandleInner::Pending(load),
        }
    }

    /// Whether both handles observe the same in-flight load.
    pub fn shares_load_with(&self, other: &LoadHandle) -> bool {
        match (&self.inner, &other.inner) {
            (HandleInner::Pending(a), HandleInner::Pending(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    fn peek(&self) -> Option<&LoadOutcome> {
        match &self.inner {
            HandleInner::Settled(outcome) => Some(outcome),
            HandleInner::Pending(load) => load.peek(),
        }
    }
}

impl Future for LoadHandle {
    type Output = LoadOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            HandleInner::Settled(outcome) => Poll::Ready(outcome.clone()),
            HandleInner::Pending(load) => load.poll_unpin(cx),
        }
    }
}

impl Loadable for LoadHandle {
    fn key(&self) -> &TypeKey {
        &self.key
    }

    fn state(&self) -> LoadState {
        match self.peek() {
            None => LoadState::Loading,
            Some(Ok(_)) => LoadState::Loaded,
            Some(Err(_)) => LoadState::Failed,
        }
    }

    fn result(&self) -> Option<LoadOutcome> {
        self.peek().cloned()
    }
}

impl fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadHandle")
            .field("key", &self.key)
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// Lazy Loader
// ============================================================================

/// Memoizing loader for the types of one domain.
///
/// # Example
///
/// ```rust,ignore
/// let loader = LazyLoader::for_domain(Domain::Selector, source, spawner);
/// let handle = loader.ensure_loaded(&TypeKey::new("theme"))?;
/// let factory = handle.await?;
/// ```
pub struct LazyLoader {
    table: &'static DomainTable,
    registry: Registry,
    source: Arc<dyn ModuleSource>,
    spawner: Arc<dyn Spawner>,
    config: LoaderConfig,
}

impl LazyLoader {
    /// A loader over a static domain table with default settings.
    pub fn new(
        table: &'static DomainTable,
        source: Arc<dyn ModuleSource>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        Self {
            table,
            registry: Registry::from_table(table),
            source,
            spawner,
            config: LoaderConfig::default(),
        }
    }

    /// The loader of a built-in domain.
    pub fn for_domain(
        domain: Domain,
        source: Arc<dyn ModuleSource>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        Self::new(catalog::table(domain), source, spawner)
    }

    /// Replace the settings.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        #[cfg(not(feature = "tokio"))]
        if config.load_timeout_ms.is_some() {
            tracing::warn!(
                domain = %self.domain(),
                "load timeout configured without the `tokio` feature; it is ignored"
            );
        }
        self.config = config;
        self
    }

    /// Domain of the loaded types.
    pub fn domain(&self) -> Domain {
        self.table.domain()
    }

    /// The static table this loader was built from.
    pub fn table(&self) -> &'static DomainTable {
        self.table
    }

    /// The registry of lazily loaded types.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current settings.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The executor loads run on.
    pub fn spawner(&self) -> &Arc<dyn Spawner> {
        &self.spawner
    }

    /// Whether `key` is eager or has a registry entry.
    pub fn is_known(&self, key: &str) -> bool {
        self.table.eager().is_eager(key) || self.registry.contains(key)
    }

    /// Ensure the module of `key` is available or being loaded.
    ///
    /// Never waits: the returned handle settles when the module is usable.
    /// Concurrent callers share one fetch. A previously failed load is
    /// retried or replayed depending on [`RetryPolicy`].
    pub fn ensure_loaded(&self, key: &TypeKey) -> Result<LoadHandle, LoaderError> {
        let domain = self.domain();

        if self.table.eager().is_eager(key) {
            tracing::trace!(%domain, %key, "eager type");
            return Ok(LoadHandle::settled(key.clone(), self.bundled(key)));
        }

        let Some(entry) = self.registry.entry(key) else {
            tracing::warn!(%domain, %key, "unknown type");
            return Err(LoaderError::UnknownType {
                domain,
                key: key.clone(),
            });
        };

        let mut state = entry.state.lock();
        match &*state {
            EntryState::Loaded(factory) => {
                return Ok(LoadHandle::settled(key.clone(), Ok(factory.clone())));
            }
            EntryState::Loading(load) => {
                return Ok(LoadHandle::pending(key.clone(), load.clone()));
            }
            EntryState::Failed(err) if self.config.retry == RetryPolicy::Sticky => {
                return Ok(LoadHandle::settled(key.clone(), Err(err.clone())));
            }
            EntryState::Unloaded | EntryState::Failed(_) => {}
        }

        let load = self.start(entry);
        *state = EntryState::Loading(load.clone());
        drop(state);

        self.spawner.spawn(load.clone().map(|_| ()).boxed());
        Ok(LoadHandle::pending(key.clone(), load))
    }

    /// Load `key` and wait for the outcome.
    pub async fn load(&self, key: &TypeKey) -> Result<FactoryRef, LoaderError> {
        Ok(self.ensure_loaded(key)?.await?)
    }

    fn bundled(&self, key: &TypeKey) -> LoadOutcome {
        let element = self.domain().element_name(key);
        match self.source.bundled(&element) {
            Some(factory) => Ok(factory),
            None => {
                tracing::warn!(domain = %self.domain(), %key, %element, "eager type not bundled");
                Err(LoadError::NotBundled {
                    domain: self.domain(),
                    key: key.clone(),
                    element,
                })
            }
        }
    }

    fn start(&self, entry: &Arc<LoaderEntry>) -> SharedLoad {
        let domain = self.domain();
        let key = entry.key.clone();
        let module = entry.module;
        let attempt = entry.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(%domain, %key, module, attempt, "loading module");

        let fetch = fetch_within(self.source.fetch(module), self.config.load_timeout());
        let entry = Arc::clone(entry);

        async move {
            let outcome = match fetch.await {
                Ok(Ok(factory)) => {
                    tracing::info!(%domain, %key, module, "module loaded");
                    Ok(factory)
                }
                Ok(Err(source)) => {
                    tracing::warn!(%domain, %key, module, error = %source, "module load failed");
                    Err(LoadError::Fetch {
                        domain,
                        key,
                        module,
                        source: Arc::from(source),
                    })
                }
                Err(timeout) => {
                    tracing::warn!(%domain, %key, module, ?timeout, "module load timed out");
                    Err(LoadError::Timeout {
                        domain,
                        key,
                        module,
                        timeout,
                    })
                }
            };

            *entry.state.lock() = match &outcome {
                Ok(factory) => EntryState::Loaded(factory.clone()),
                Err(err) => EntryState::Failed(err.clone()),
            };
            outcome
        }
        .boxed()
        .shared()
    }
}

impl fmt::Debug for LazyLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyLoader")
            .field("domain", &self.domain())
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

type FetchResult = Result<FactoryRef, BoxError>;

// `Err` carries the elapsed limit.
#[cfg(feature = "tokio")]
async fn fetch_within(
    fetch: BoxFuture<'static, FetchResult>,
    limit: Option<Duration>,
) -> Result<FetchResult, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .map_err(|_| limit),
        None => Ok(fetch.await),
    }
}

#[cfg(not(feature = "tokio"))]
async fn fetch_within(
    fetch: BoxFuture<'static, FetchResult>,
    _limit: Option<Duration>,
) -> Result<FetchResult, Duration> {
    Ok(fetch.await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSource;

    fn spawner() -> Arc<dyn Spawner> {
        Arc::new(|task: BoxFuture<'static, ()>| {
            tokio::spawn(task);
        })
    }

    fn loader(domain: Domain, source: &Arc<ScriptedSource>) -> LazyLoader {
        LazyLoader::for_domain(domain, source.clone(), spawner())
    }

    #[test]
    fn test_registry_mirrors_table() {
        let registry = Registry::from_table(catalog::table(Domain::Card));
        assert_eq!(registry.domain(), Domain::Card);
        assert!(registry.contains("gauge"));
        assert!(!registry.contains("entities"));
        assert_eq!(registry.module("gauge"), Some("hui-gauge-card"));
        assert_eq!(registry.status("gauge"), Some(EntryStatus::Unloaded));
        assert_eq!(registry.status("nope"), None);
        assert_eq!(registry.attempts("gauge"), 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let source = Arc::new(ScriptedSource::new().manual("ha-selector-theme"));
        let loader = loader(Domain::Selector, &source);
        let key = TypeKey::new("theme");

        let handles: Vec<_> = (0..8).map(|_| loader.ensure_loaded(&key).unwrap()).collect();
        assert!(handles.windows(2).all(|w| w[0].shares_load_with(&w[1])));
        assert!(handles.iter().all(|h| h.state() == LoadState::Loading));
        assert_eq!(loader.registry().status("theme"), Some(EntryStatus::Loading));

        tokio::task::yield_now().await;
        assert_eq!(source.fetch_count("ha-selector-theme"), 1);

        assert!(source.complete("ha-selector-theme"));
        for handle in handles {
            let factory = handle.await.unwrap();
            assert_eq!(factory.element(), "ha-selector-theme");
        }
        assert_eq!(source.fetch_count("ha-selector-theme"), 1);
        assert_eq!(loader.registry().status("theme"), Some(EntryStatus::Loaded));

        // Settled: later requests do not fetch again.
        let again = loader.ensure_loaded(&key).unwrap();
        assert_eq!(again.state(), LoadState::Loaded);
        assert_eq!(loader.registry().attempts("theme"), 1);
    }

    #[tokio::test]
    async fn test_eager_types_skip_the_registry() {
        let source = Arc::new(ScriptedSource::new().with_bundled("hui-entities-card"));
        let loader = loader(Domain::Card, &source);

        let handle = loader.ensure_loaded(&TypeKey::new("entities")).unwrap();
        assert!(handle.is_ready());
        assert_eq!(handle.await.unwrap().element(), "hui-entities-card");
        assert_eq!(source.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_eager_type_missing_from_bundle() {
        let source = Arc::new(ScriptedSource::new());
        let loader = loader(Domain::Card, &source);

        let handle = loader.ensure_loaded(&TypeKey::new("button")).unwrap();
        assert_eq!(handle.state(), LoadState::Failed);
        assert!(matches!(
            handle.await,
            Err(LoadError::NotBundled { ref element, .. }) if element == "hui-button-card"
        ));
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let source = Arc::new(ScriptedSource::new());
        let loader = loader(Domain::Card, &source);

        let err = loader.ensure_loaded(&TypeKey::new("nonexistent")).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::UnknownType { domain: Domain::Card, ref key } if key == "nonexistent"
        ));
        assert_eq!(source.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_failed_load_is_reattempted() {
        let source = Arc::new(ScriptedSource::new().failing("ha-selector-theme", "offline"));
        let loader = loader(Domain::Selector, &source);
        let key = TypeKey::new("theme");

        let err = loader.load(&key).await.unwrap_err();
        assert!(matches!(err, LoaderError::Load(LoadError::Fetch { .. })));
        assert_eq!(loader.registry().status("theme"), Some(EntryStatus::Failed));

        source.succeed("ha-selector-theme");
        let factory = loader.load(&key).await.unwrap();
        assert_eq!(factory.element(), "ha-selector-theme");
        assert_eq!(source.fetch_count("ha-selector-theme"), 2);
        assert_eq!(loader.registry().attempts("theme"), 2);
    }

    #[tokio::test]
    async fn test_sticky_failure_is_replayed() {
        let source = Arc::new(ScriptedSource::new().failing("ha-selector-theme", "offline"));
        let loader = loader(Domain::Selector, &source)
            .with_config(LoaderConfig::new().with_retry(RetryPolicy::Sticky));
        let key = TypeKey::new("theme");

        assert!(loader.load(&key).await.is_err());
        source.succeed("ha-selector-theme");

        let handle = loader.ensure_loaded(&key).unwrap();
        assert_eq!(handle.state(), LoadState::Failed);
        let err = handle.await.unwrap_err();
        assert_eq!(err.key(), "theme");
        assert_eq!(source.fetch_count("ha-selector-theme"), 1);
    }

    #[tokio::test]
    async fn test_load_continues_without_handles() {
        let source = Arc::new(ScriptedSource::new().manual("hui-map-card"));
        let loader = loader(Domain::Card, &source);

        drop(loader.ensure_loaded(&TypeKey::new("map")).unwrap());
        tokio::task::yield_now().await;
        assert!(source.complete("hui-map-card"));

        for _ in 0..16 {
            if loader.registry().status("map") == Some(EntryStatus::Loaded) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(loader.registry().status("map"), Some(EntryStatus::Loaded));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_load_timeout() {
        let source = Arc::new(ScriptedSource::new().manual("hui-map-card"));
        let loader = loader(Domain::Card, &source)
            .with_config(LoaderConfig::new().with_load_timeout(Duration::from_millis(50)));

        let err = loader.load(&TypeKey::new("map")).await.unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Load(LoadError::Timeout { timeout, .. }) if timeout == Duration::from_millis(50)
        ));
        assert_eq!(loader.registry().status("map"), Some(EntryStatus::Failed));
    }
}
