//! # Static Catalogs
//!
//! One [`DomainTable`] per dispatch domain, declared as compile-time perfect
//! hash tables. The tables are never mutated: the per-type load state lives
//! in the loader's [`Registry`](crate::loader::Registry), which is built from
//! a table once.
//!
//! | Domain    | Discriminant          | Eager | Lazy |
//! |-----------|-----------------------|-------|------|
//! | Selector  | top-level key         | none  | all  |
//! | Card      | `type` field          | common cards | the rest |
//! | MoreInfo  | entity domain         | `default`, `hidden` | per-domain controls |
//! | Action    | `action` field        | actions without options | editors with options |

pub mod actions;
pub mod cards;
pub mod more_info;
pub mod selectors;

use tessera_core::Domain;

/// The fixed allowlist of types that are bundled and never go through the
/// loader.
#[derive(Clone, Copy)]
pub struct EagerSet {
    set: Option<&'static phf::Set<&'static str>>,
}

impl EagerSet {
    /// An eager set backed by a static table.
    pub const fn new(set: &'static phf::Set<&'static str>) -> Self {
        Self { set: Some(set) }
    }

    /// An empty eager set: every type of the domain is lazy.
    pub const fn none() -> Self {
        Self { set: None }
    }

    /// Whether `key` is bundled.
    pub fn is_eager(&self, key: &str) -> bool {
        self.set.is_some_and(|set| set.contains(key))
    }

    /// Iterate over the eager keys.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + 'static {
        self.set.into_iter().flat_map(|set| set.iter().copied())
    }

    /// Number of eager keys.
    pub fn len(&self) -> usize {
        self.set.map_or(0, |set| set.len())
    }

    /// Whether no key is eager.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EagerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The static declaration of one dispatch domain.
pub struct DomainTable {
    domain: Domain,
    eager: EagerSet,
    modules: &'static phf::Map<&'static str, &'static str>,
    aliases: Option<&'static phf::Map<&'static str, &'static str>>,
    derive: Option<fn(&str) -> &'static str>,
}

impl DomainTable {
    /// Declare a domain: its eager set and its `type -> module` table.
    pub const fn new(
        domain: Domain,
        eager: EagerSet,
        modules: &'static phf::Map<&'static str, &'static str>,
    ) -> Self {
        Self {
            domain,
            eager,
            modules,
            aliases: None,
            derive: None,
        }
    }

    /// Add deprecated spellings, rewritten to their canonical key before lookup.
    pub const fn with_aliases(
        mut self,
        aliases: &'static phf::Map<&'static str, &'static str>,
    ) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Add the function mapping a derived discriminant (an entity domain) to
    /// a type key.
    pub const fn with_derive(mut self, derive: fn(&str) -> &'static str) -> Self {
        self.derive = Some(derive);
        self
    }

    /// The domain this table declares.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// The eager set.
    pub fn eager(&self) -> &EagerSet {
        &self.eager
    }

    /// The module implementing a lazy type.
    pub fn module(&self, key: &str) -> Option<&'static str> {
        self.modules.get(key).copied()
    }

    /// Iterate over `(type, module)` pairs of the lazy types.
    pub fn modules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + 'static {
        self.modules.entries().map(|(key, module)| (*key, *module))
    }

    /// The canonical key of a deprecated spelling.
    pub fn alias(&self, key: &str) -> Option<&'static str> {
        self.aliases.and_then(|aliases| aliases.get(key).copied())
    }

    /// Iterate over `(alias, canonical)` pairs.
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> + 'static {
        self.aliases
            .into_iter()
            .flat_map(|aliases| aliases.entries().map(|(alias, key)| (*alias, *key)))
    }

    /// Map a derived discriminant to a type key, if the domain derives keys.
    pub fn derive(&self, raw: &str) -> Option<&'static str> {
        self.derive.map(|derive| derive(raw))
    }

    /// Whether `key` is a known type (eager or lazy).
    pub fn contains(&self, key: &str) -> bool {
        self.eager.is_eager(key) || self.modules.contains_key(key)
    }
}

impl std::fmt::Debug for DomainTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainTable")
            .field("domain", &self.domain)
            .field("eager", &self.eager)
            .field("lazy", &self.modules.len())
            .finish()
    }
}

/// The static table of a domain.
pub fn table(domain: Domain) -> &'static DomainTable {
    match domain {
        Domain::Selector => &selectors::SELECTORS,
        Domain::Card => &cards::CARDS,
        Domain::MoreInfo => &more_info::MORE_INFO,
        Domain::Action => &actions::ACTIONS,
    }
}
