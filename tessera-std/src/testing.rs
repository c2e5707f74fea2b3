//! Testing utilities for Tessera.
//!
//! This module provides utilities to make testing dispatchers and loaders
//! easier.
//!
//! # Features
//!
//! - [`RecordingFactory`]: A factory that counts the instances it builds
//! - [`EchoComponent`]: A component that renders the props it received
//! - [`ScriptedSource`]: A module source whose fetches succeed, fail, or
//!   wait for the test to settle them

use futures::{FutureExt, channel::oneshot, future};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tessera_core::{
    BoxError, BoxFuture, Component, ComponentFactory, FactoryRef, ModuleSource, Props,
};

// ============================================================================
// Recording Factory
// ============================================================================

/// A factory that counts created instances and instance updates.
///
/// # Example
///
/// ```rust,ignore
/// let factory = RecordingFactory::new("hui-gauge-card");
/// let mut component = factory.create(props);
/// component.update(next_props);
///
/// assert_eq!(factory.created(), 1);
/// assert_eq!(factory.updates(), 1);
/// ```
pub struct RecordingFactory {
    element: String,
    created: AtomicUsize,
    updates: Arc<AtomicUsize>,
}

impl RecordingFactory {
    /// Create a new recording factory.
    pub fn new(element: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            element: element.into(),
            created: AtomicUsize::new(0),
            updates: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of instances built so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Number of `update` calls across all instances.
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl ComponentFactory for RecordingFactory {
    fn element(&self) -> &str {
        &self.element
    }

    fn create(&self, props: Props) -> Box<dyn Component> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(EchoComponent {
            element: self.element.clone(),
            props,
            updates: self.updates.clone(),
        })
    }
}

// ============================================================================
// Echo Component
// ============================================================================

/// Renders `{ "element": .., "props": .. }` from the last props it received.
pub struct EchoComponent {
    element: String,
    props: Props,
    updates: Arc<AtomicUsize>,
}

impl EchoComponent {
    /// A standalone instance.
    pub fn new(element: impl Into<String>, props: Props) -> Self {
        Self {
            element: element.into(),
            props,
            updates: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The props of the last update.
    pub fn props(&self) -> &Props {
        &self.props
    }
}

impl Component for EchoComponent {
    fn update(&mut self, props: Props) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.props = props;
    }

    fn render(&self) -> Value {
        json!({
            "element": self.element,
            "props": self.props.to_value(),
        })
    }
}

// ============================================================================
// Scripted Source
// ============================================================================

/// How a [`ScriptedSource`] answers a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Resolve immediately with the module's factory.
    Succeed,
    /// Fail immediately with the message.
    Fail(String),
    /// Stay pending until [`ScriptedSource::complete`] or
    /// [`ScriptedSource::fail`] is called.
    Manual,
}

type Waiter = oneshot::Sender<Result<FactoryRef, BoxError>>;

#[derive(Default)]
struct ScriptState {
    bundle: HashMap<String, FactoryRef>,
    scripts: HashMap<String, Script>,
    factories: HashMap<String, Arc<RecordingFactory>>,
    fetches: HashMap<String, usize>,
    waiters: HashMap<String, Vec<Waiter>>,
}

impl ScriptState {
    fn factory(&mut self, module: &str) -> Arc<RecordingFactory> {
        self.factories
            .entry(module.to_string())
            .or_insert_with(|| RecordingFactory::new(module))
            .clone()
    }
}

/// A module source driven by the test.
///
/// Every module resolves to a [`RecordingFactory`] whose element name is the
/// module name, unless scripted otherwise. Fetches are counted per module.
///
/// # Example
///
/// ```rust,ignore
/// let source = Arc::new(ScriptedSource::new().manual("ha-selector-theme"));
/// // ... start a load ...
/// assert_eq!(source.fetch_count("ha-selector-theme"), 1);
/// source.complete("ha-selector-theme");
/// ```
#[derive(Default)]
pub struct ScriptedSource {
    state: Mutex<ScriptState>,
}

impl ScriptedSource {
    /// A source where every fetch succeeds and nothing is bundled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle a recording factory under `element`.
    pub fn with_bundled(self, element: &str) -> Self {
        {
            let mut state = self.state.lock();
            let factory = state.factory(element);
            state.bundle.insert(element.to_string(), factory);
        }
        self
    }

    /// Bundle a recording factory under each of `elements`.
    pub fn with_bundle<'a>(self, elements: impl IntoIterator<Item = &'a str>) -> Self {
        elements
            .into_iter()
            .fold(self, |source, element| source.with_bundled(element))
    }

    /// Make fetches of `module` wait for the test.
    pub fn manual(self, module: &str) -> Self {
        self.script(module, Script::Manual);
        self
    }

    /// Make fetches of `module` fail.
    pub fn failing(self, module: &str, message: &str) -> Self {
        self.script(module, Script::Fail(message.to_string()));
        self
    }

    /// Change how later fetches of `module` are answered.
    pub fn script(&self, module: &str, script: Script) {
        self.state.lock().scripts.insert(module.to_string(), script);
    }

    /// Make later fetches of `module` succeed.
    pub fn succeed(&self, module: &str) {
        self.script(module, Script::Succeed);
    }

    /// Resolve every pending fetch of `module`. Returns whether any was pending.
    pub fn complete(&self, module: &str) -> bool {
        let (waiters, factory) = {
            let mut state = self.state.lock();
            let factory: FactoryRef = state.factory(module);
            (state.waiters.remove(module).unwrap_or_default(), factory)
        };
        let any = !waiters.is_empty();
        for waiter in waiters {
            let _ = waiter.send(Ok(factory.clone()));
        }
        any
    }

    /// Fail every pending fetch of `module`. Returns whether any was pending.
    pub fn fail(&self, module: &str, message: &str) -> bool {
        let waiters = self.state.lock().waiters.remove(module).unwrap_or_default();
        let any = !waiters.is_empty();
        for waiter in waiters {
            let _ = waiter.send(Err(message.to_string().into()));
        }
        any
    }

    /// Number of fetches of `module` so far.
    pub fn fetch_count(&self, module: &str) -> usize {
        self.state.lock().fetches.get(module).copied().unwrap_or(0)
    }

    /// Number of fetches across all modules.
    pub fn total_fetches(&self) -> usize {
        self.state.lock().fetches.values().sum()
    }

    /// The factory `module` resolves to.
    pub fn factory(&self, module: &str) -> Arc<RecordingFactory> {
        self.state.lock().factory(module)
    }
}

impl ModuleSource for ScriptedSource {
    fn bundled(&self, element: &str) -> Option<FactoryRef> {
        self.state.lock().bundle.get(element).cloned()
    }

    fn fetch(&self, module: &'static str) -> BoxFuture<'static, Result<FactoryRef, BoxError>> {
        let mut state = self.state.lock();
        *state.fetches.entry(module.to_string()).or_insert(0) += 1;

        match state.scripts.get(module).cloned().unwrap_or(Script::Succeed) {
            Script::Succeed => {
                let factory: FactoryRef = state.factory(module);
                future::ready(Ok(factory)).boxed()
            }
            Script::Fail(message) => future::ready(Err(message.into())).boxed(),
            Script::Manual => {
                let (tx, rx) = oneshot::channel();
                state.waiters.entry(module.to_string()).or_default().push(tx);
                async move {
                    rx.await
                        .unwrap_or_else(|_| Err(format!("fetch of `{module}` abandoned").into()))
                }
                .boxed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{RenderContext, TypeKey};

    fn props(key: &str) -> Props {
        Props::new(
            TypeKey::new(key),
            Value::Null,
            Default::default(),
            RenderContext::default(),
        )
    }

    #[test]
    fn test_recording_factory_counts() {
        let factory = RecordingFactory::new("hui-gauge-card");
        let mut component = factory.create(props("gauge"));
        component.update(props("gauge"));
        component.update(props("gauge"));

        assert_eq!(factory.created(), 1);
        assert_eq!(factory.updates(), 2);
        assert_eq!(component.render()["element"], json!("hui-gauge-card"));
    }

    #[tokio::test]
    async fn test_manual_fetch_waits() {
        let source = ScriptedSource::new().manual("hui-map-card");
        let fetch = source.fetch("hui-map-card");
        assert_eq!(source.fetch_count("hui-map-card"), 1);

        assert!(source.complete("hui-map-card"));
        let factory = fetch.await.unwrap();
        assert_eq!(factory.element(), "hui-map-card");
        assert!(!source.complete("hui-map-card"));
    }

    #[tokio::test]
    async fn test_failing_fetch() {
        let source = ScriptedSource::new().failing("hui-map-card", "boom");
        let err = source.fetch("hui-map-card").await.err().unwrap();
        assert_eq!(err.to_string(), "boom");
    }
}
