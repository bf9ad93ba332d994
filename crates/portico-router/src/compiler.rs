//! Route compilation: declarations in, route table out.
//!
//! Method routes inherit the class defaults, get their template joined to the
//! class prefix, and are inserted once per effective verb. Any collision on a
//! (pattern, verb) key or an alias aborts compilation.

use tracing::{debug, info, warn};

use crate::alias::AliasEntry;
use crate::declaration::{ClassDeclaration, RouteDeclaration};
use crate::entry::{HandlerRef, RouteEntry};
use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::path::{RoutePattern, TemplateError};
use crate::table::{RouteTable, MAX_WILDCARD_DEPTH};

/// Builds a [`RouteTable`] from class declarations.
///
/// # Example
///
/// ```
/// use portico_router::{ClassDeclaration, Compiler, RouteDeclaration};
///
/// let mut compiler = Compiler::new();
/// compiler
///     .add_class(
///         &ClassDeclaration::new("HealthPort")
///             .verbs(["GET", "HEAD"])
///             .route(RouteDeclaration::new("ping", "/ping")),
///     )
///     .unwrap();
/// let table = compiler.finish();
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    table: RouteTable,
}

impl Compiler {
    /// Creates a compiler with an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles every method route of a class.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRouteDefinition`],
    /// [`RouterError::DuplicateRouteAlias`],
    /// [`RouterError::InvalidPlaceholder`],
    /// [`RouterError::DuplicatePlaceholder`] or
    /// [`RouterError::TemplateTooDeep`]. Routes inserted before the
    /// failure stay in the compiler; callers are expected to discard it.
    pub fn add_class(&mut self, class: &ClassDeclaration) -> Result<()> {
        for route in &class.routes {
            if route.not_route {
                debug!(class = %class.class, method = %route.method, "skipping non-route method");
                continue;
            }
            self.add_route(class, route)?;
        }
        Ok(())
    }

    /// Returns the compiled table.
    #[must_use]
    pub fn finish(self) -> RouteTable {
        info!(
            routes = self.table.len(),
            aliases = self.table.aliases().len(),
            "route table compiled"
        );
        self.table
    }

    fn add_route(&mut self, class: &ClassDeclaration, route: &RouteDeclaration) -> Result<()> {
        let handler = HandlerRef {
            class: class.class.clone(),
            method: route.method.clone(),
            parameters: route.parameters.clone(),
        };

        let template = match class.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}/{}", route.route),
            _ => route.route.clone(),
        };
        let parsed = RoutePattern::parse_template(&template).map_err(|err| match err {
            TemplateError::InvalidPlaceholder(segment) => RouterError::InvalidPlaceholder {
                segment: segment.to_string(),
                template: template.clone(),
                handler: handler.to_string(),
            },
            TemplateError::DuplicatePlaceholder(name) => RouterError::DuplicatePlaceholder {
                name: name.to_string(),
                template: template.clone(),
                handler: handler.to_string(),
            },
        })?;
        if !parsed.param_names.is_empty() && parsed.pattern.len() > MAX_WILDCARD_DEPTH {
            return Err(RouterError::TemplateTooDeep {
                template,
                handler: handler.to_string(),
                depth: parsed.pattern.len(),
                max: MAX_WILDCARD_DEPTH,
            });
        }

        let verbs = unique(route.verbs.as_ref().unwrap_or(&class.verbs).iter().cloned());
        if verbs.is_empty() {
            warn!(handler = %handler, template = %template, "route declares no verbs; nothing registered");
            return Ok(());
        }

        let suffix_allow = unique(
            route
                .suffixes
                .as_ref()
                .unwrap_or(&class.suffixes)
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );
        let pipes = unique(class.pipes.iter().chain(&route.pipes).cloned());
        let alias = route
            .alias
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        for verb in verbs {
            self.check_route(&parsed.pattern, &verb, &handler)?;
            if let Some(alias) = alias {
                self.check_alias(alias, &parsed.pattern, &verb, &handler)?;
                self.table.insert_alias(
                    alias.to_string(),
                    AliasEntry {
                        pattern: parsed.pattern.clone(),
                        verb: verb.clone(),
                    },
                );
            }

            debug!(%verb, pattern = %parsed.pattern, handler = %handler, "route registered");
            self.table.insert(RouteEntry {
                pattern: parsed.pattern.clone(),
                verb,
                alias: alias.map(str::to_string),
                suffix_allow: suffix_allow.clone(),
                handler: handler.clone(),
                param_names: parsed.param_names.clone(),
                pipes: pipes.clone(),
                mimein: route.mimein.resolve(class.mimein.as_ref()),
                mimeout: route.mimeout.resolve(class.mimeout.as_ref()),
                wrapin: route.wrapin.resolve(class.wrapin.as_ref()),
                wrapout: route.wrapout.resolve(class.wrapout.as_ref()),
                wraperr: route.wraperr.resolve(class.wraperr.as_ref()),
            });
        }

        Ok(())
    }

    fn check_route(&self, pattern: &RoutePattern, verb: &Method, handler: &HandlerRef) -> Result<()> {
        match self.table.get(pattern, verb) {
            Some(existing) => Err(RouterError::DuplicateRouteDefinition {
                verb: verb.to_string(),
                pattern: pattern.to_string(),
                handler: handler.to_string(),
                existing: existing.handler.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn check_alias(
        &self,
        alias: &str,
        pattern: &RoutePattern,
        verb: &Method,
        handler: &HandlerRef,
    ) -> Result<()> {
        let Some(key) = self.table.aliases().resolve(alias) else {
            return Ok(());
        };
        let existing_handler = self
            .table
            .get(&key.pattern, &key.verb)
            .map_or_else(|| "?".to_string(), |e| e.handler.to_string());
        Err(RouterError::DuplicateRouteAlias {
            alias: alias.to_string(),
            verb: verb.to_string(),
            pattern: pattern.to_string(),
            handler: handler.to_string(),
            existing_verb: key.verb.to_string(),
            existing_pattern: key.pattern.to_string(),
            existing_handler,
        })
    }
}

/// Collects items, dropping repeats and keeping first occurrences.
fn unique<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Override;

    fn users() -> ClassDeclaration {
        ClassDeclaration::new("UserPort")
            .prefix("users")
            .verbs(["GET"])
            .suffixes(["JSON", " xml "])
            .pipe("auth")
            .mimeout("json")
            .wrapout("classic")
    }

    #[test]
    fn test_inherits_class_defaults() {
        let class = users().route(RouteDeclaration::new("show", "{id}").pipe("paginate").pipe("auth"));
        let table = RouteTable::compile([class]).unwrap();
        let entry = table.routes().next().unwrap();

        assert_eq!(entry.verb, Method::Get);
        assert_eq!(entry.pattern.to_string(), "/users/{*}");
        assert_eq!(entry.param_names, vec!["id"]);
        assert_eq!(entry.suffix_allow, vec!["json", "xml"]);
        assert_eq!(entry.pipes, vec!["auth", "paginate"]);
        assert_eq!(entry.mimeout.as_deref(), Some("json"));
        assert_eq!(entry.wrapout.as_deref(), Some("classic"));
        assert_eq!(entry.mimein, None);
    }

    #[test]
    fn test_method_overrides() {
        let class = users().route(
            RouteDeclaration::new("update", "{id}")
                .verbs(["put", "patch"])
                .suffixes(Vec::<String>::new())
                .mimeout(Override::Clear)
                .wrapout(Override::Set("raw".into())),
        );
        let table = RouteTable::compile([class]).unwrap();

        assert_eq!(table.len(), 2);
        for entry in table.routes() {
            assert!(entry.suffix_allow.is_empty());
            assert_eq!(entry.mimeout, None);
            assert_eq!(entry.wrapout.as_deref(), Some("raw"));
        }
        let verbs: Vec<_> = table.routes().map(|e| e.verb.clone()).collect();
        assert_eq!(verbs, vec![Method::Put, Method::Patch]);
    }

    #[test]
    fn test_param_names_match_wildcards() {
        let class = ClassDeclaration::new("CommentPort")
            .prefix("/posts/{post}/")
            .verbs(["GET"])
            .route(RouteDeclaration::new("show", "comments/{comment}"));
        let table = RouteTable::compile([class]).unwrap();
        let entry = table.routes().next().unwrap();

        assert_eq!(entry.param_names, vec!["post", "comment"]);
        assert_eq!(entry.param_names.len(), entry.pattern.wildcard_count());
    }

    #[test]
    fn test_not_route_skipped() {
        let class = users()
            .route(RouteDeclaration::new("helper", "helper").not_route())
            .route(RouteDeclaration::new("index", ""));
        let table = RouteTable::compile([class]).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.routes().next().unwrap().handler.method, "index");
    }

    #[test]
    fn test_no_verbs_registers_nothing() {
        let class = ClassDeclaration::new("Idle").route(RouteDeclaration::new("noop", "noop"));
        let table = RouteTable::compile([class]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_repeated_verbs_collapse() {
        let class = ClassDeclaration::new("Ping")
            .verbs(["GET", "get"])
            .route(RouteDeclaration::new("ping", "ping"));
        let table = RouteTable::compile([class]).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_invalid_placeholder() {
        let class = users().route(RouteDeclaration::new("broken", "{}"));
        let err = RouteTable::compile([class]).unwrap_err();
        assert!(matches!(
            err,
            RouterError::InvalidPlaceholder { ref segment, ref template, .. }
                if segment == "{}" && template == "users/{}"
        ));
    }

    #[test]
    fn test_repeated_placeholder_rejected() {
        let class = users().route(RouteDeclaration::new("pair", "{id}/b/{id}"));
        let err = RouteTable::compile([class]).unwrap_err();
        assert!(matches!(
            err,
            RouterError::DuplicatePlaceholder { ref name, ref template, ref handler }
                if name == "id" && template == "users/{id}/b/{id}" && handler == "UserPort@pair"
        ));
    }

    #[test]
    fn test_deep_wildcard_template_rejected() {
        let deep = format!("{}/{{id}}", vec!["x"; MAX_WILDCARD_DEPTH].join("/"));
        let class = ClassDeclaration::new("Deep")
            .verbs(["GET"])
            .route(RouteDeclaration::new("show", deep));
        let err = RouteTable::compile([class]).unwrap_err();
        assert!(matches!(
            err,
            RouterError::TemplateTooDeep { depth, max, .. }
                if depth == MAX_WILDCARD_DEPTH + 1 && max == MAX_WILDCARD_DEPTH
        ));
    }

    #[test]
    fn test_deep_literal_template_allowed() {
        let deep = vec!["x"; MAX_WILDCARD_DEPTH + 1].join("/");
        let class = ClassDeclaration::new("Deep")
            .verbs(["GET"])
            .route(RouteDeclaration::new("show", deep.clone()));
        let table = RouteTable::compile([class]).unwrap();
        assert!(table.find(&deep, &Method::Get, &[]).is_some());
    }

    #[test]
    fn test_deepest_wildcard_template_matches() {
        let template = format!("{}/{{id}}", vec!["x"; MAX_WILDCARD_DEPTH - 1].join("/"));
        let path = format!("{}/42", vec!["x"; MAX_WILDCARD_DEPTH - 1].join("/"));
        let class = ClassDeclaration::new("Deep")
            .verbs(["GET"])
            .route(RouteDeclaration::new("show", template));
        let table = RouteTable::compile([class]).unwrap();
        let matched = table.find(&path, &Method::Get, &[]).unwrap();
        assert_eq!(matched.params.get("id"), Some("42"));
    }

    #[test]
    fn test_duplicate_definition_names_both_handlers() {
        let class = users()
            .route(RouteDeclaration::new("show", "{id}"))
            .route(RouteDeclaration::new("display", "{slug}"));
        let err = RouteTable::compile([class]).unwrap_err();
        match err {
            RouterError::DuplicateRouteDefinition { verb, pattern, handler, existing } => {
                assert_eq!(verb, "GET");
                assert_eq!(pattern, "/users/{*}");
                assert_eq!(handler, "UserPort@display");
                assert_eq!(existing, "UserPort@show");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_alias_on_multi_verb_route_conflicts() {
        let class = ClassDeclaration::new("FormPort")
            .verbs(["GET", "POST"])
            .route(RouteDeclaration::new("form", "form").alias("form"));
        let err = RouteTable::compile([class]).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRouteAlias { ref alias, .. } if alias == "form"));
    }

    #[test]
    fn test_blank_alias_ignored() {
        let class = users()
            .route(RouteDeclaration::new("index", "").alias("  "))
            .route(RouteDeclaration::new("show", "{id}").alias(""));
        let table = RouteTable::compile([class]).unwrap();
        assert!(table.aliases().is_empty());
        assert!(table.routes().all(|e| e.alias.is_none()));
    }
}
