//! Shared ownership of the active route table.
//!
//! Matching reads the current table without locking. A recompile builds a
//! whole new table and swaps it in atomically; requests already holding the
//! old table finish against it and the old table drops with its last `Arc`.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use crate::alias::AliasEntry;
use crate::config::MatcherConfig;
use crate::declaration::ClassDeclaration;
use crate::entry::MatchedRoute;
use crate::error::Result;
use crate::method::Method;
use crate::table::RouteTable;

/// The active [`RouteTable`] plus the matcher settings applied to it.
///
/// # Example
///
/// ```
/// use portico_router::{ClassDeclaration, MatcherConfig, Method, RouteDeclaration, RouteRegistry};
///
/// let v1 = ClassDeclaration::new("Home")
///     .verbs(["GET"])
///     .route(RouteDeclaration::new("index", "/"));
/// let registry = RouteRegistry::compile([v1], MatcherConfig::default()).unwrap();
/// assert!(registry.with_route("/", &Method::Get, |m| m.is_some()));
///
/// let v2 = ClassDeclaration::new("Home")
///     .verbs(["GET"])
///     .route(RouteDeclaration::new("about", "/about"));
/// registry.recompile([v2]).unwrap();
/// assert!(registry.with_route("/", &Method::Get, |m| m.is_none()));
/// ```
#[derive(Debug)]
pub struct RouteRegistry {
    active: ArcSwap<RouteTable>,
    config: MatcherConfig,
}

impl RouteRegistry {
    /// Wraps an already compiled table.
    #[must_use]
    pub fn new(table: RouteTable, config: MatcherConfig) -> Self {
        Self {
            active: ArcSwap::new(Arc::new(table)),
            config: config.normalized(),
        }
    }

    /// Compiles declarations into a new registry.
    ///
    /// # Errors
    ///
    /// Propagates any compilation error.
    pub fn compile<I>(classes: I, config: MatcherConfig) -> Result<Self>
    where
        I: IntoIterator<Item = ClassDeclaration>,
    {
        Ok(Self::new(RouteTable::compile(classes)?, config))
    }

    /// Snapshot of the active table.
    #[must_use]
    pub fn current(&self) -> Arc<RouteTable> {
        self.active.load_full()
    }

    /// Matcher settings.
    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Rebuilds the table from scratch and swaps it in.
    ///
    /// On failure the previous table stays active.
    ///
    /// # Errors
    ///
    /// Propagates any compilation error.
    pub fn recompile<I>(&self, classes: I) -> Result<()>
    where
        I: IntoIterator<Item = ClassDeclaration>,
    {
        let table = match RouteTable::compile(classes) {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, "recompile rejected; keeping active route table");
                return Err(err);
            }
        };
        let routes = table.len();
        let old = self.active.swap(Arc::new(table));
        info!(old_routes = old.len(), new_routes = routes, "route table swapped");
        Ok(())
    }

    /// Replaces the active table with an already compiled one.
    pub fn replace(&self, table: RouteTable) {
        let old = self.active.swap(Arc::new(table));
        info!(old_routes = old.len(), "route table replaced");
    }

    /// Resolves an alias against the active table.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<AliasEntry> {
        self.active.load().aliases().resolve(alias).cloned()
    }

    /// Matches a request against the active table and hands the result to `f`.
    ///
    /// The table stays pinned for the duration of `f`, even if a recompile
    /// swaps it out meanwhile.
    pub fn with_route<R>(
        &self,
        path: &str,
        verb: &Method,
        f: impl FnOnce(Option<MatchedRoute<'_>>) -> R,
    ) -> R {
        let table = self.active.load();
        f(table.find_with(&self.config, path, verb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::RouteDeclaration;

    fn class(method: &str, route: &str) -> ClassDeclaration {
        ClassDeclaration::new("Port")
            .verbs(["GET"])
            .route(RouteDeclaration::new(method, route))
    }

    #[test]
    fn test_failed_recompile_keeps_table() {
        let registry = RouteRegistry::compile([class("a", "a")], MatcherConfig::default()).unwrap();
        let broken = class("a", "a").route(RouteDeclaration::new("b", "a"));

        assert!(registry.recompile([broken]).is_err());
        assert_eq!(registry.current().len(), 1);
        assert!(registry.with_route("/a", &Method::Get, |m| m.is_some()));
    }

    #[test]
    fn test_resolve_follows_swap() {
        let aliased = |alias: &str| {
            ClassDeclaration::new("Port")
                .verbs(["GET"])
                .route(RouteDeclaration::new("a", "a").alias(alias))
        };
        let registry = RouteRegistry::compile([aliased("old")], MatcherConfig::default()).unwrap();
        assert!(registry.resolve("old").is_some());

        registry.recompile([aliased("new")]).unwrap();
        assert!(registry.resolve("old").is_none());
        assert_eq!(registry.resolve("new").unwrap().verb, Method::Get);
    }

    #[test]
    fn test_snapshot_survives_swap() {
        let registry = RouteRegistry::compile([class("a", "a")], MatcherConfig::default()).unwrap();
        let before = registry.current();

        registry.replace(RouteTable::new());

        assert!(before.find("/a", &Method::Get, &[]).is_some());
        assert!(registry.current().is_empty());
    }

    #[test]
    fn test_config_is_normalized() {
        let registry = RouteRegistry::new(RouteTable::new(), MatcherConfig {
            suffixes: vec![" JSON ".into()],
            ..MatcherConfig::default()
        });
        assert_eq!(registry.config().suffixes, vec!["json"]);
    }
}
