//! Dispatch sites.

use super::{Begin, Dispatcher, Rendered};
use crate::loader::LoadHandle;
use futures::{
    FutureExt,
    channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
    future::{AbortHandle, Abortable},
};
use serde_json::Value;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tessera_core::{Component, FactoryRef, Loadable, Props, RenderContext, TypeKey};

static NEXT_SITE: AtomicU64 = AtomicU64::new(1);

/// Identity of a dispatch site, as sent on the re-render channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(u64);

impl SiteId {
    fn next() -> Self {
        Self(NEXT_SITE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site#{}", self.0)
    }
}

/// A channel on which sites ask to be re-rendered.
pub fn rerender_channel() -> (UnboundedSender<SiteId>, UnboundedReceiver<SiteId>) {
    mpsc::unbounded()
}

/// Where a site is in its dispatch cycle.
///
/// `Idle -> Resolving -> {Placeholder | Ready | Error}`; a placeholder turns
/// into `Ready` or `Error` once its load settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePhase {
    /// Nothing dispatched yet.
    Idle,
    /// A dispatch is in progress.
    Resolving,
    /// Waiting for a module.
    Placeholder,
    /// A component is mounted.
    Ready,
    /// A fallback or failure was rendered.
    Error,
}

struct Instance {
    key: TypeKey,
    element: String,
    component: Box<dyn Component>,
}

struct Watcher {
    handle: LoadHandle,
    abort: AbortHandle,
}

/// A place in the rendering tree bound to a live component.
///
/// The site creates the component on the first ready dispatch of a type,
/// forwards later property sets to it, and replaces it when the type
/// changes. While a load is pending it watches the load and sends its
/// [`SiteId`] exactly once when the load settles; the owner then calls
/// [`DispatchSite::refresh`]. Dropping the site stops the watch but never
/// the load.
///
/// # Example
///
/// ```rust,ignore
/// let (notify, mut rerender) = rerender_channel();
/// let mut site = DispatchSite::new(dispatcher, notify);
///
/// site.render(&json!({ "device": {} }), &ctx); // placeholder
/// let id = rerender.next().await;
/// site.refresh(); // ready
/// ```
pub struct DispatchSite {
    id: SiteId,
    dispatcher: Arc<Dispatcher>,
    notify: UnboundedSender<SiteId>,
    phase: SitePhase,
    instance: Option<Instance>,
    last: Option<(Value, RenderContext)>,
    watcher: Option<Watcher>,
}

impl DispatchSite {
    /// A new idle site reporting to `notify`.
    pub fn new(dispatcher: Arc<Dispatcher>, notify: UnboundedSender<SiteId>) -> Self {
        Self {
            id: SiteId::next(),
            dispatcher,
            notify,
            phase: SitePhase::Idle,
            instance: None,
            last: None,
            watcher: None,
        }
    }

    /// Identity of this site.
    pub fn id(&self) -> SiteId {
        self.id
    }

    /// Current phase.
    pub fn phase(&self) -> SitePhase {
        self.phase
    }

    /// Type of the mounted component.
    pub fn key(&self) -> Option<&TypeKey> {
        self.instance.as_ref().map(|instance| &instance.key)
    }

    /// Whether a pending load is being watched.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Dispatch a new config.
    ///
    /// A settled watcher is dropped first, so a failed load is retried
    /// according to the loader's retry policy. [`refresh`](Self::refresh)
    /// keeps it and replays the outcome.
    pub fn render(&mut self, raw: &Value, context: &RenderContext) -> Rendered {
        if self.watcher.as_ref().is_some_and(|watcher| watcher.handle.is_ready()) {
            self.stop_watching();
        }
        self.last = Some((raw.clone(), context.clone()));
        self.dispatch(raw, context)
    }

    /// Dispatch the last config again, typically after a notification.
    pub fn refresh(&mut self) -> Option<Rendered> {
        let (raw, context) = self.last.take()?;
        let rendered = self.dispatch(&raw, &context);
        self.last = Some((raw, context));
        Some(rendered)
    }

    fn dispatch(&mut self, raw: &Value, context: &RenderContext) -> Rendered {
        self.phase = SitePhase::Resolving;

        let watched = self.watcher.as_ref().map(|watcher| &watcher.handle);
        match self.dispatcher.begin(raw, context, watched) {
            Begin::Fallback(error) => {
                self.unmount();
                self.phase = SitePhase::Error;
                self.dispatcher.fallback(error)
            }
            Begin::Failed { key, error } => {
                self.unmount();
                self.phase = SitePhase::Error;
                self.dispatcher.failed(key, error)
            }
            Begin::Loading { props, handle } => {
                let key = props.key().clone();
                if self.key() != Some(&key) {
                    self.instance = None;
                }
                self.watch(handle);
                self.phase = SitePhase::Placeholder;
                Rendered::Placeholder { key }
            }
            Begin::Loaded { props, factory } => {
                self.stop_watching();
                self.phase = SitePhase::Ready;
                self.mount(props, factory)
            }
        }
    }

    fn mount(&mut self, props: Props, factory: FactoryRef) -> Rendered {
        let key = props.key().clone();
        let instance = match self.instance.take() {
            Some(mut instance) if instance.key == key => {
                instance.component.update(props);
                instance
            }
            _ => {
                tracing::debug!(domain = %self.dispatcher.domain(), %key, site = %self.id, "mounting component");
                Instance {
                    key: key.clone(),
                    element: factory.element().to_string(),
                    component: factory.create(props),
                }
            }
        };

        let rendered = Rendered::Ready {
            key,
            element: instance.element.clone(),
            view: instance.component.render(),
        };
        self.instance = Some(instance);
        rendered
    }

    fn unmount(&mut self) {
        self.stop_watching();
        self.instance = None;
    }

    // One watcher per pending load, so a load notifies at most once.
    fn watch(&mut self, handle: LoadHandle) {
        if let Some(watcher) = &self.watcher {
            if watcher.handle.shares_load_with(&handle) {
                return;
            }
        }
        self.stop_watching();

        let (abort, registration) = AbortHandle::new_pair();
        let notify = self.notify.clone();
        let id = self.id;
        let waiting = handle.clone();
        let task = Abortable::new(
            async move {
                let _ = waiting.await;
                // The owner may be gone already.
                let _ = notify.unbounded_send(id);
            },
            registration,
        );
        self.dispatcher
            .loader()
            .spawner()
            .spawn(task.map(|_| ()).boxed());

        tracing::trace!(key = %handle.key(), site = %id, "watching load");
        self.watcher = Some(Watcher { handle, abort });
    }

    fn stop_watching(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort.abort();
        }
    }
}

impl Drop for DispatchSite {
    fn drop(&mut self) {
        self.stop_watching();
    }
}

impl fmt::Debug for DispatchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchSite")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("key", &self.key())
            .field("watching", &self.is_watching())
            .finish()
    }
}
