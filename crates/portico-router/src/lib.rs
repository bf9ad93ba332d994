//! # portico-router
//!
//! Route compilation and matching for annotated handler classes.
//!
//! This crate provides:
//! - Compilation of class/method route declarations into an immutable table
//! - Conflict detection for duplicate (path, verb) keys and aliases
//! - Matching with exact paths, `{name}` wildcards and content-type suffixes
//! - Alias lookup and reverse URL generation
//! - Atomic table swapping for recompiles
//! - JSON route manifests
//!
//! ## Quick Start
//!
//! ```
//! use portico_router::{ClassDeclaration, Method, RouteDeclaration, RouteTable};
//!
//! let users = ClassDeclaration::new("UserPort")
//!     .prefix("/users")
//!     .verbs(["GET"])
//!     .suffixes(["json"])
//!     .route(RouteDeclaration::new("index", "/"))
//!     .route(RouteDeclaration::new("show", "{id}").alias("user.show"));
//!
//! let table = RouteTable::compile([users]).unwrap();
//!
//! let suffixes = vec!["json".to_string()];
//! let matched = table.find("/users/42.json", &Method::Get, &suffixes).unwrap();
//! assert_eq!(matched.handler.method, "show");
//! assert_eq!(matched.params.get("id"), Some("42"));
//! assert_eq!(matched.suffix(), Some("json"));
//!
//! assert!(table.find("/users/42", &Method::Post, &[]).is_none());
//! ```
//!
//! ## Declarations
//!
//! Class-level defaults (verbs, suffixes, pipes, MIME and wrap hints) are
//! inherited by each method route. MIME and wrap hints use [`Override`] so a
//! method can inherit, replace, or clear them:
//!
//! ```
//! use portico_router::{ClassDeclaration, Override, RouteDeclaration, RouteTable};
//!
//! let api = ClassDeclaration::new("ApiPort")
//!     .verbs(["GET"])
//!     .wrapout("classic")
//!     .route(RouteDeclaration::new("raw", "raw").wrapout(Override::Clear));
//!
//! let table = RouteTable::compile([api]).unwrap();
//! assert_eq!(table.routes().next().unwrap().wrapout, None);
//! ```
//!
//! ## Named Routes
//!
//! ```
//! use std::collections::HashMap;
//! use portico_router::{ClassDeclaration, RouteDeclaration, RouteTable};
//!
//! let table = RouteTable::compile([ClassDeclaration::new("UserPort")
//!     .verbs(["GET"])
//!     .route(RouteDeclaration::new("show", "/users/{id}").alias("user_detail"))])
//! .unwrap();
//!
//! let params: HashMap<String, String> = [("id".to_string(), "123".to_string())].into();
//! assert_eq!(table.url_for("user_detail", &params), Some("/users/123".to_string()));
//! ```

mod alias;
mod compiler;
mod config;
mod declaration;
mod entry;
mod error;
mod manifest;
mod matcher;
mod method;
mod path;
mod registry;
mod table;

pub use alias::{AliasEntry, AliasIndex};
pub use compiler::Compiler;
pub use config::{MatcherConfig, Precedence};
pub use declaration::{
    normalize_route, split_pipes, split_suffixes, split_verbs, ClassDeclaration, Override,
    ParameterDescriptor, RouteDeclaration,
};
pub use entry::{HandlerRef, MatchedRoute, RouteEntry};
pub use error::{Result, RouterError};
pub use manifest::Manifest;
pub use matcher::Matcher;
pub use method::{Method, PathParams};
pub use path::{split_segments, ParsedTemplate, RoutePattern, Segment, TemplateError};
pub use registry::RouteRegistry;
pub use table::{RouteTable, MAX_WILDCARD_DEPTH};
