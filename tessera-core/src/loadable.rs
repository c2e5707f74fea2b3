//! The capability of a deferred module load.

use crate::{component::FactoryRef, error::LoadError, key::TypeKey};
use std::future::Future;

/// The value every waiter of a load observes.
pub type LoadOutcome = Result<FactoryRef, LoadError>;

/// Observable state of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Still in flight.
    Loading,
    /// Settled successfully.
    Loaded,
    /// Settled with a failure.
    Failed,
}

/// A handle on a load that was started (or found already settled).
///
/// Awaiting the handle yields the shared outcome; cloning it is cheap and
/// every clone observes the same completion.
pub trait Loadable: Future<Output = LoadOutcome> + Clone + Send + Unpin {
    /// The type being loaded.
    fn key(&self) -> &TypeKey;

    /// The current state, without waiting.
    fn state(&self) -> LoadState;

    /// The outcome, if settled.
    fn result(&self) -> Option<LoadOutcome>;

    /// Whether the load has settled (either way).
    fn is_ready(&self) -> bool {
        self.state() != LoadState::Loading
    }
}
