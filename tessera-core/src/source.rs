//! Collaborator contracts: where modules come from and where loads run.

use crate::{component::FactoryRef, error::BoxError};

/// A boxed, sendable future.
pub use futures::future::BoxFuture;

/// The provider of component modules.
///
/// Eager types are served synchronously from the bundle; lazy types are
/// fetched, possibly over the network. A fetch is only ever requested by
/// the loader, at most once per in-flight load.
pub trait ModuleSource: Send + Sync + 'static {
    /// A module that is already available, looked up by element name.
    fn bundled(&self, element: &str) -> Option<FactoryRef>;

    /// Fetch and initialize a lazily loaded module.
    fn fetch(&self, module: &'static str) -> BoxFuture<'static, Result<FactoryRef, BoxError>>;
}

/// An executor able to drive a detached background task.
///
/// Any `Fn(BoxFuture<'static, ()>)` closure is a spawner, so hooking up a
/// runtime is a one-liner: `|task| { tokio::spawn(task); }`.
pub trait Spawner: Send + Sync + 'static {
    /// Run `task` to completion in the background.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

impl<F> Spawner for F
where
    F: Fn(BoxFuture<'static, ()>) + Send + Sync + 'static,
{
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        (self)(task)
    }
}
