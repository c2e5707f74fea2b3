//! # tessera-core
//!
//! Core traits and types for the Tessera lazy component registry.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! component modules that only need to describe themselves, without pulling
//! in the catalogs, loader and dispatcher from `tessera-std`.
//!
//! # Vocabulary
//!
//! A dashboard configuration is a tree of JSON-like objects. Each object is a
//! polymorphic variant of some [`Domain`] (a selector, a card, a more-info
//! control, an action editor) and carries a discriminant naming the variant.
//!
//! - [`TypeKey`] - the canonical discriminant string
//! - [`Domain`] - the dispatch domain and how its discriminant is found
//! - [`Props`] / [`RenderContext`] - the property set forwarded to a component
//! - [`Component`] / [`ComponentFactory`] - the live handler instance and the
//!   entry point a component module exposes
//! - [`ModuleSource`] - the collaborator that hands out component modules,
//!   either bundled (eager) or fetched (lazy)
//! - [`Spawner`] - where background loads are driven
//! - [`Loadable`] - the capability of a pending or settled load
//!
//! # Error Types
//!
//! - [`TesseraError`] - Top-level error type
//! - [`ResolveError`] - No discriminant could be identified
//! - [`LoaderError`] - Unknown type or failed load
//! - [`LoadError`] - A module load that settled with a failure

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod component;
mod config;
mod domain;
mod error;
mod key;
mod loadable;
mod props;
mod source;

// Re-exports
pub use component::{Component, ComponentFactory, FactoryRef};
pub use config::{LoaderConfig, RetryPolicy};
pub use domain::{Discriminant, Domain};
pub use error::{
    BoxError, LoadError, LoaderError, ResolveError, SharedError, TesseraError, UnresolvedReason,
};
pub use key::{TypeKey, normalize_key};
pub use loadable::{LoadOutcome, LoadState, Loadable};
pub use props::{Config, Localize, Props, RenderContext};
pub use source::{BoxFuture, ModuleSource, Spawner};
