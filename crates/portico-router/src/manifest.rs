//! JSON route manifests.
//!
//! A manifest is what metadata extraction hands over when it runs out of
//! process: matcher settings plus the class declarations.
//!
//! ```json
//! {
//!   "matcher": { "suffixes": ["json"], "precedence": "legacy" },
//!   "classes": [
//!     {
//!       "class": "UserPort",
//!       "prefix": "users",
//!       "verbs": ["GET"],
//!       "routes": [{ "method": "show", "route": "{id}", "alias": "user.show" }]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::declaration::ClassDeclaration;
use crate::error::Result;
use crate::registry::RouteRegistry;
use crate::table::RouteTable;

/// Matcher settings and class declarations, as read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Matcher settings.
    pub matcher: MatcherConfig,
    /// Handler classes.
    pub classes: Vec<ClassDeclaration>,
}

impl Manifest {
    /// Parses a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Manifest`](crate::RouterError::Manifest) on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut manifest: Self = serde_json::from_str(json)?;
        manifest.matcher = manifest.matcher.normalized();
        Ok(manifest)
    }

    /// Compiles the classes into a table.
    ///
    /// # Errors
    ///
    /// Propagates any compilation error.
    pub fn compile(&self) -> Result<RouteTable> {
        RouteTable::compile(self.classes.iter().cloned())
    }

    /// Compiles the classes into a registry carrying the matcher settings.
    ///
    /// # Errors
    ///
    /// Propagates any compilation error.
    pub fn into_registry(self) -> Result<RouteRegistry> {
        RouteRegistry::compile(self.classes, self.matcher)
    }
}
