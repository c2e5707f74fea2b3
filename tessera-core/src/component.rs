//! # Components
//!
//! A component module exposes a [`ComponentFactory`]; the factory builds the
//! live [`Component`] bound to one dispatch site. The dispatcher owns the
//! instance, feeds it every new property set through [`Component::update`],
//! and replaces it when the site switches to a different type.

use crate::props::Props;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A live handler instance bound to a dispatch site.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a Tessera component",
    label = "missing `Component` implementation",
    note = "Components must implement `update` and `render`."
)]
pub trait Component: Send + 'static {
    /// Receive a new property set.
    fn update(&mut self, props: Props);

    /// Render the current state as a JSON-like view description.
    fn render(&self) -> Value;
}

/// The construct entry point of a component module.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a component factory",
    label = "missing `ComponentFactory` implementation",
    note = "Component modules must expose a factory that builds their component from `Props`."
)]
pub trait ComponentFactory: Send + Sync + 'static {
    /// Element name of the component (`ha-selector-device`).
    fn element(&self) -> &str;

    /// Build a new instance.
    fn create(&self, props: Props) -> Box<dyn Component>;
}

/// Shared handle to a loaded component module.
pub type FactoryRef = Arc<dyn ComponentFactory>;

impl<T: ComponentFactory + ?Sized> ComponentFactory for &'static T {
    fn element(&self) -> &str {
        (**self).element()
    }

    fn create(&self, props: Props) -> Box<dyn Component> {
        (**self).create(props)
    }
}

impl fmt::Debug for dyn ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("element", &self.element())
            .finish_non_exhaustive()
    }
}
