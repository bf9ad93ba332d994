//! Alias index: reverse lookup from a symbolic name to a route key.

use std::collections::HashMap;

use serde::Serialize;

use crate::method::Method;
use crate::path::RoutePattern;

/// The route key an alias points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasEntry {
    /// Pattern of the aliased route.
    pub pattern: RoutePattern,
    /// Verb of the aliased route.
    pub verb: Method,
}

/// Alias name to route key, filled only during compilation.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    aliases: HashMap<String, AliasEntry>,
}

impl AliasIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves an alias to its route key.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<&AliasEntry> {
        self.aliases.get(alias)
    }

    /// Number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if no alias is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterates aliases in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AliasEntry)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, alias: String, entry: AliasEntry) {
        self.aliases.insert(alias, entry);
    }
}
