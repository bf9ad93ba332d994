//! Error types for route compilation.

use thiserror::Error;

/// Errors raised while loading or compiling route declarations.
///
/// Lookup misses are not errors: the matcher and the alias index signal them
/// with `None`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Two declarations produce the same pattern for the same verb.
    #[error("duplicate route definition: {verb} {pattern} ({handler}) conflicts with ({existing})")]
    DuplicateRouteDefinition {
        /// Verb shared by both routes.
        verb: String,
        /// Compiled pattern shared by both routes.
        pattern: String,
        /// Handler being inserted.
        handler: String,
        /// Handler already registered under the same key.
        existing: String,
    },

    /// Two declarations claim the same alias.
    #[error(
        "duplicate route alias: {alias} => ({verb} {pattern} | {handler}) <=> \
         ({existing_verb} {existing_pattern} | {existing_handler})"
    )]
    DuplicateRouteAlias {
        /// The contested alias.
        alias: String,
        /// Verb of the route being inserted.
        verb: String,
        /// Pattern of the route being inserted.
        pattern: String,
        /// Handler of the route being inserted.
        handler: String,
        /// Verb of the route already holding the alias.
        existing_verb: String,
        /// Pattern of the route already holding the alias.
        existing_pattern: String,
        /// Handler of the route already holding the alias.
        existing_handler: String,
    },

    /// A `{...}` template segment does not name a parameter.
    #[error("invalid placeholder '{segment}' in route template '{template}' ({handler})")]
    InvalidPlaceholder {
        /// The offending segment.
        segment: String,
        /// The full template it came from.
        template: String,
        /// Handler declaring the template.
        handler: String,
    },

    /// A template declares the same parameter name twice.
    #[error("duplicate placeholder '{{{name}}}' in route template '{template}' ({handler})")]
    DuplicatePlaceholder {
        /// The repeated parameter name.
        name: String,
        /// The full template it came from.
        template: String,
        /// Handler declaring the template.
        handler: String,
    },

    /// A wildcard template is deeper than the matcher searches.
    #[error("route template '{template}' ({handler}) has {depth} segments; wildcard routes allow at most {max}")]
    TemplateTooDeep {
        /// The full template.
        template: String,
        /// Handler declaring the template.
        handler: String,
        /// Number of segments in the template.
        depth: usize,
        /// Deepest wildcard route the matcher can reach.
        max: usize,
    },

    /// A route manifest could not be parsed.
    #[error("invalid route manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
