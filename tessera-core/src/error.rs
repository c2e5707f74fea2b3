//! Error types for Tessera.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`TesseraError`] - Top-level error type for all Tessera operations
//! - [`ResolveError`] - No discriminant could be identified in a raw config
//! - [`LoaderError`] - No loader exists for a type, or its load failed
//! - [`LoadError`] - A settled module load that failed
//!
//! None of these are fatal: the dispatcher turns each of them into a
//! fallback or error rendering. All of them are `Clone` so one failed load
//! can be observed by every waiter.

use crate::{domain::Domain, key::TypeKey};
use std::{sync::Arc, time::Duration};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A reference-counted error, shared between all observers of one load.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Tessera operations.
#[derive(Error, Debug, Clone)]
pub enum TesseraError {
    /// The raw config carried no usable discriminant.
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// The type has no loader, or its load failed.
    #[error("loader error: {0}")]
    Loader(#[from] LoaderError),
}

impl From<LoadError> for TesseraError {
    fn from(err: LoadError) -> Self {
        TesseraError::Loader(LoaderError::Load(err))
    }
}

/// Why a discriminant could not be identified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The config object has no keys at all.
    #[error("config object is empty")]
    Empty,

    /// The config is not an object.
    #[error("config is not an object")]
    NotAnObject,

    /// The discriminant field is absent.
    #[error("missing `{0}` field")]
    MissingField(&'static str),

    /// The discriminant field is not a string.
    #[error("`{0}` field is not a string")]
    NotAString(&'static str),

    /// The discriminant is blank after trimming.
    #[error("`{0}` is blank")]
    Blank(&'static str),

    /// The entity id has no `<domain>.<object_id>` shape.
    #[error("malformed entity id `{0}`")]
    MalformedEntityId(String),
}

/// Errors raised while extracting a discriminant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No discriminant could be identified.
    #[error("unresolved {domain} type: {reason}")]
    UnresolvedType {
        /// Domain the config was dispatched in.
        domain: Domain,
        /// What was wrong with the config.
        reason: UnresolvedReason,
    },
}

impl ResolveError {
    /// Domain of the failed resolution.
    pub fn domain(&self) -> Domain {
        match self {
            ResolveError::UnresolvedType { domain, .. } => *domain,
        }
    }
}

/// Errors raised by the lazy loader.
#[derive(Error, Debug, Clone)]
pub enum LoaderError {
    /// The discriminant was identified but no registry entry exists for it.
    #[error("unknown {domain} type `{key}`")]
    UnknownType {
        /// Domain the key was looked up in.
        domain: Domain,
        /// The key without a registry entry.
        key: TypeKey,
    },

    /// The module load settled with a failure.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// A module load that settled with a failure.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The module source failed to produce the module.
    #[error("failed to load `{module}` for {domain} type `{key}`")]
    Fetch {
        /// Domain of the type.
        domain: Domain,
        /// The type being loaded.
        key: TypeKey,
        /// Module requested from the source.
        module: &'static str,
        /// Underlying failure reported by the source.
        #[source]
        source: SharedError,
    },

    /// An eager type is not present in the bundle.
    #[error("eager {domain} type `{key}` is not bundled as `{element}`")]
    NotBundled {
        /// Domain of the type.
        domain: Domain,
        /// The eager type.
        key: TypeKey,
        /// Element name looked up in the bundle.
        element: String,
    },

    /// The module source did not answer in time.
    #[error("loading `{module}` for {domain} type `{key}` timed out after {timeout:?}")]
    Timeout {
        /// Domain of the type.
        domain: Domain,
        /// The type being loaded.
        key: TypeKey,
        /// Module requested from the source.
        module: &'static str,
        /// The configured limit.
        timeout: Duration,
    },
}

impl LoadError {
    /// The type whose load failed.
    pub fn key(&self) -> &TypeKey {
        match self {
            LoadError::Fetch { key, .. }
            | LoadError::NotBundled { key, .. }
            | LoadError::Timeout { key, .. } => key,
        }
    }

    /// Domain of the type whose load failed.
    pub fn domain(&self) -> Domain {
        match self {
            LoadError::Fetch { domain, .. }
            | LoadError::NotBundled { domain, .. }
            | LoadError::Timeout { domain, .. } => *domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_fetch_error_keeps_source() {
        let err = LoadError::Fetch {
            domain: Domain::Selector,
            key: TypeKey::new("theme"),
            module: "ha-selector-theme",
            source: Arc::new(std::io::Error::other("network down")),
        };
        assert_eq!(
            err.to_string(),
            "failed to load `ha-selector-theme` for selector type `theme`"
        );
        assert_eq!(err.source().unwrap().to_string(), "network down");

        let cloned = err.clone();
        assert_eq!(cloned.key(), "theme");
        assert_eq!(cloned.domain(), Domain::Selector);
    }

    #[test]
    fn test_conversions_into_top_level() {
        let unresolved = ResolveError::UnresolvedType {
            domain: Domain::Card,
            reason: UnresolvedReason::MissingField("type"),
        };
        let err: TesseraError = unresolved.into();
        assert!(matches!(err, TesseraError::Resolve(_)));
        assert_eq!(
            err.to_string(),
            "resolve error: unresolved card type: missing `type` field"
        );

        let unknown = LoaderError::UnknownType {
            domain: Domain::Card,
            key: TypeKey::new("nonexistent"),
        };
        let err: TesseraError = unknown.into();
        assert_eq!(err.to_string(), "loader error: unknown card type `nonexistent`");
    }
}
