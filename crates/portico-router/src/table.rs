//! The compiled route table.
//!
//! Built once by the [`Compiler`](crate::Compiler) and read-only afterwards,
//! so a table can be shared across threads behind an `Arc` without locking.

use std::collections::HashMap;

use crate::alias::{AliasEntry, AliasIndex};
use crate::compiler::Compiler;
use crate::config::MatcherConfig;
use crate::declaration::ClassDeclaration;
use crate::entry::{MatchedRoute, RouteEntry};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::method::Method;
use crate::path::{RoutePattern, Segment};

/// Path depth beyond which the wildcard search is not attempted.
pub const MAX_WILDCARD_DEPTH: usize = 64;

/// Map from (pattern, verb) to [`RouteEntry`], plus the alias index.
///
/// # Example
///
/// ```
/// use portico_router::{ClassDeclaration, Method, RouteDeclaration, RouteTable};
///
/// let users = ClassDeclaration::new("UserPort")
///     .prefix("users")
///     .verbs(["GET"])
///     .route(RouteDeclaration::new("show", "{id}").alias("user.show"));
///
/// let table = RouteTable::compile([users]).unwrap();
///
/// let matched = table.find("/users/42", &Method::Get, &[]).unwrap();
/// assert_eq!(matched.params.get("id"), Some("42"));
/// assert_eq!(matched.handler.to_string(), "UserPort@show");
///
/// let key = table.aliases().resolve("user.show").unwrap();
/// assert_eq!(key.pattern.to_string(), "/users/{*}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    index: HashMap<RoutePattern, HashMap<Method, usize>>,
    /// Per pattern length, the union of wildcard positions counted from the
    /// last segment (bit 0).
    wildcard_masks: HashMap<usize, u64>,
    aliases: AliasIndex,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles class declarations into a table.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate (pattern, verb), a duplicate alias, or a
    /// malformed placeholder.
    pub fn compile<I>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClassDeclaration>,
    {
        let mut compiler = Compiler::new();
        for class in classes {
            compiler.add_class(&class)?;
        }
        Ok(compiler.finish())
    }

    /// Exact lookup of a (pattern, verb) key.
    #[must_use]
    pub fn get(&self, pattern: &RoutePattern, verb: &Method) -> Option<&RouteEntry> {
        self.index
            .get(pattern)
            .and_then(|verbs| verbs.get(verb))
            .map(|&idx| &self.entries[idx])
    }

    /// Verbs registered for a pattern.
    pub fn verbs_for(&self, pattern: &RoutePattern) -> impl Iterator<Item = &Method> {
        self.index.get(pattern).into_iter().flat_map(HashMap::keys)
    }

    /// Matches a request path with the default matcher.
    #[must_use]
    pub fn find<'a>(
        &'a self,
        path: &str,
        verb: &Method,
        suffixes: &[String],
    ) -> Option<MatchedRoute<'a>> {
        Matcher::default().find(self, path, verb, suffixes)
    }

    /// Matches a request path using the suffixes and precedence in `config`.
    #[must_use]
    pub fn find_with<'a>(
        &'a self,
        config: &MatcherConfig,
        path: &str,
        verb: &Method,
    ) -> Option<MatchedRoute<'a>> {
        Matcher::new(config.precedence).find(self, path, verb, &config.suffixes)
    }

    /// The alias index.
    #[must_use]
    pub const fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }

    /// Looks up the entry an alias points at.
    #[must_use]
    pub fn route_for_alias(&self, alias: &str) -> Option<&RouteEntry> {
        let key = self.aliases.resolve(alias)?;
        self.get(&key.pattern, &key.verb)
    }

    /// Generates a path for an aliased route.
    #[must_use]
    pub fn url_for(&self, alias: &str, params: &HashMap<String, String>) -> Option<String> {
        let entry = self.route_for_alias(alias)?;
        entry.pattern.reverse(&entry.param_names, params)
    }

    /// Iterates entries in compilation order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Number of (pattern, verb) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wildcard positions any pattern of `len` segments uses, as a bitmask
    /// over reversed positions. `None` when no such pattern exists.
    pub(crate) fn wildcard_mask(&self, len: usize) -> Option<u64> {
        self.wildcard_masks.get(&len).copied()
    }

    pub(crate) fn insert(&mut self, entry: RouteEntry) {
        let len = entry.pattern.len();
        if len <= MAX_WILDCARD_DEPTH {
            let mask = entry
                .pattern
                .segments()
                .iter()
                .rev()
                .enumerate()
                .filter(|(_, segment)| matches!(segment, Segment::Wildcard))
                .fold(0u64, |mask, (pos, _)| mask | (1 << pos));
            *self.wildcard_masks.entry(len).or_default() |= mask;
        }

        let idx = self.entries.len();
        self.index
            .entry(entry.pattern.clone())
            .or_default()
            .insert(entry.verb.clone(), idx);
        self.entries.push(entry);
    }

    pub(crate) fn insert_alias(&mut self, alias: String, entry: AliasEntry) {
        self.aliases.insert(alias, entry);
    }
}
