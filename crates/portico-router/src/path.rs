//! Route patterns: the segment sequences used as table keys.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_]*)\}$").expect("Invalid placeholder regex")
});

/// A segment in a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A literal string segment.
    Literal(String),
    /// Matches any single path segment at this position.
    Wildcard,
}

/// A compiled route pattern.
///
/// Displayed with wildcards as `{*}`, which no template can declare as a
/// literal segment.
///
/// Two patterns are equal when their segments are equal position by
/// position; a wildcard only equals another wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

/// Result of parsing a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Compiled pattern with placeholders replaced by wildcards.
    pub pattern: RoutePattern,
    /// Placeholder names in template order.
    pub param_names: Vec<String>,
}

/// Why a route template was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError<'a> {
    /// A `{...}` segment whose body is not a parameter name.
    InvalidPlaceholder(&'a str),
    /// A parameter name that already appeared earlier in the template.
    DuplicatePlaceholder(&'a str),
}

/// Splits a request path or template into its non-empty segments.
pub fn split_segments(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl RoutePattern {
    /// Builds a pattern from explicit segments.
    #[must_use]
    pub const fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Builds a purely literal pattern from a request path.
    ///
    /// ```
    /// use portico_router::RoutePattern;
    ///
    /// assert_eq!(
    ///     RoutePattern::literal("/users/42/"),
    ///     RoutePattern::literal("users//42"),
    /// );
    /// ```
    #[must_use]
    pub fn literal(path: &str) -> Self {
        Self {
            segments: split_segments(path)
                .map(|s| Segment::Literal(s.to_string()))
                .collect(),
        }
    }

    /// Parses a route template, turning `{name}` segments into wildcards.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidPlaceholder`] with the offending
    /// segment when a brace-delimited segment does not hold a valid parameter
    /// name (`{}`, `{1id}`, `{a-b}`), and
    /// [`TemplateError::DuplicatePlaceholder`] with the name when a parameter
    /// is declared twice.
    ///
    /// # Example
    ///
    /// ```
    /// use portico_router::RoutePattern;
    ///
    /// let parsed = RoutePattern::parse_template("/posts/{id}/comments/{comment_id}").unwrap();
    /// assert_eq!(parsed.param_names, vec!["id", "comment_id"]);
    /// assert_eq!(parsed.pattern.to_string(), "/posts/{*}/comments/{*}");
    /// ```
    pub fn parse_template(template: &str) -> Result<ParsedTemplate, TemplateError<'_>> {
        let mut segments = Vec::new();
        let mut param_names = Vec::new();

        for part in split_segments(template) {
            let braced = part.strip_prefix('{').and_then(|s| s.strip_suffix('}'));
            if braced.is_none() {
                segments.push(Segment::Literal(part.to_string()));
                continue;
            }
            let name = PLACEHOLDER
                .captures(part)
                .and_then(|caps| caps.get(1))
                .ok_or(TemplateError::InvalidPlaceholder(part))?
                .as_str();
            if param_names.iter().any(|known| known == name) {
                return Err(TemplateError::DuplicatePlaceholder(name));
            }
            param_names.push(name.to_string());
            segments.push(Segment::Wildcard);
        }

        Ok(ParsedTemplate {
            pattern: Self { segments },
            param_names,
        })
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of wildcard segments.
    #[must_use]
    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard))
            .count()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the root pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Generates a path by filling wildcards with named values.
    ///
    /// `param_names` are matched to wildcards left to right. Returns `None`
    /// when a value is missing.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use portico_router::RoutePattern;
    ///
    /// let parsed = RoutePattern::parse_template("/posts/{id}").unwrap();
    /// let params: HashMap<String, String> =
    ///     [("id".to_string(), "123".to_string())]
    ///     .into_iter()
    ///     .collect();
    /// let path = parsed.pattern.reverse(&parsed.param_names, &params).unwrap();
    /// assert_eq!(path, "/posts/123");
    /// ```
    #[must_use]
    pub fn reverse(
        &self,
        param_names: &[String],
        params: &HashMap<String, String>,
    ) -> Option<String> {
        let mut path = String::new();
        let mut names = param_names.iter();

        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(s) => path.push_str(s),
                Segment::Wildcard => path.push_str(params.get(names.next()?)?),
            }
        }

        if path.is_empty() {
            path.push('/');
        }

        Some(path)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => write!(f, "/{s}")?,
                Segment::Wildcard => f.write_str("/{*}")?,
            }
        }
        Ok(())
    }
}

impl Serialize for RoutePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
