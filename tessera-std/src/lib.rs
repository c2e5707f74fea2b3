//! # tessera-std
//!
//! Standard implementations for the Tessera lazy component registry.
//!
//! This crate provides:
//! - **Catalogs**: the static type tables of every domain ([`catalog`])
//! - **Resolution**: discriminant extraction and legacy normalization ([`Resolver`])
//! - **Lazy loading**: memoized module loads ([`LazyLoader`], [`LoadHandle`])
//! - **Dispatch**: rendering with placeholders and fallbacks ([`Dispatcher`], [`DispatchSite`])
//! - **Module sources**: [`MapSource`] and, with `inventory`, [`InventorySource`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use tessera_core;

// Modules
pub mod catalog;
pub mod dispatch;
pub mod loader;
pub mod resolve;
pub mod source;
#[cfg(feature = "tokio")]
pub mod spawn;
pub mod testing;

pub use catalog::{DomainTable, EagerSet};
pub use dispatch::{
    DispatchSite, Dispatcher, DispatcherRef, Rendered, SiteId, SitePhase, rerender_channel,
};
pub use loader::{EntryStatus, LazyLoader, LoadHandle, Registry};
pub use resolve::{Resolved, Resolver};
pub use source::{MapSource, MissingModule};
#[cfg(feature = "inventory")]
pub use source::{ComponentRegistration, InventorySource};
#[cfg(feature = "tokio")]
pub use spawn::TokioSpawner;

#[cfg(feature = "inventory")]
pub use inventory;
