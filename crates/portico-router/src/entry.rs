//! Compiled route entries and match results.

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use crate::declaration::ParameterDescriptor;
use crate::method::{Method, PathParams};
use crate::path::RoutePattern;

/// Opaque reference to the handler a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerRef {
    /// Handler class identity.
    pub class: String,
    /// Handler method name.
    pub method: String,
    /// Method parameters, passed through for the dispatcher.
    pub parameters: Vec<ParameterDescriptor>,
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.class, self.method)
    }
}

/// A compiled route, owned by the [`RouteTable`](crate::RouteTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Lookup pattern.
    pub pattern: RoutePattern,
    /// Verb this entry answers.
    pub verb: Method,
    /// Unique alias, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Suffixes this route accepts, lower-case.
    pub suffix_allow: Vec<String>,
    /// Handler to dispatch to.
    pub handler: HandlerRef,
    /// Wildcard names, left to right.
    pub param_names: Vec<String>,
    /// Pipe names, class pipes first.
    pub pipes: Vec<String>,
    /// Resolved request MIME type.
    pub mimein: Option<String>,
    /// Resolved response MIME type.
    pub mimeout: Option<String>,
    /// Resolved request unwrapper.
    pub wrapin: Option<String>,
    /// Resolved response wrapper.
    pub wrapout: Option<String>,
    /// Resolved error wrapper.
    pub wraperr: Option<String>,
}

impl RouteEntry {
    /// Returns `true` if `suffix` is on this route's allow-list.
    #[must_use]
    pub fn allows_suffix(&self, suffix: &str) -> bool {
        self.suffix_allow.iter().any(|s| s == suffix)
    }
}

/// A successful match: the stored entry plus what this request bound.
///
/// Created fresh for every lookup and never shared between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRoute<'a> {
    /// The matched entry.
    #[serde(flatten)]
    pub entry: &'a RouteEntry,
    /// Suffix stripped from the request path.
    pub suffix: Option<String>,
    /// Captured wildcard values.
    pub params: PathParams,
}

impl<'a> MatchedRoute<'a> {
    pub(crate) const fn exact(entry: &'a RouteEntry) -> Self {
        Self {
            entry,
            suffix: None,
            params: PathParams::new(),
        }
    }

    /// Returns the suffix stripped from the request, if any.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }
}

impl Deref for MatchedRoute<'_> {
    type Target = RouteEntry;

    fn deref(&self) -> &Self::Target {
        self.entry
    }
}
