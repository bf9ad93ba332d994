//! Matcher configuration.

use serde::{Deserialize, Serialize};

/// Order in which wildcard subsets are tried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// Ascending bitmask over reversed segment positions; the last path
    /// segment is the least significant bit. First hit wins.
    #[default]
    Legacy,
    /// Fewest wildcards first, ties broken by ascending bitmask.
    FewestWildcards,
}

/// Settings for request matching.
///
/// # Example
///
/// ```
/// use portico_router::{MatcherConfig, Precedence};
///
/// let config: MatcherConfig =
///     serde_json::from_str(r#"{"suffixes": [" JSON", "xml"]}"#).unwrap();
/// let config = config.normalized();
/// assert_eq!(config.suffixes, vec!["json", "xml"]);
/// assert_eq!(config.precedence, Precedence::Legacy);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Known suffixes, tried in order.
    pub suffixes: Vec<String>,
    /// Wildcard subset ordering.
    pub precedence: Precedence,
}

impl MatcherConfig {
    /// Creates a config with the given suffixes and legacy precedence.
    pub fn with_suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            precedence: Precedence::default(),
        }
        .normalized()
    }

    /// Sets the precedence.
    #[must_use]
    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Lower-cases and trims suffixes, dropping empties and repeats.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let mut suffixes: Vec<String> = Vec::with_capacity(self.suffixes.len());
        for suffix in self.suffixes {
            let suffix = suffix.trim().trim_start_matches('.').to_lowercase();
            if !suffix.is_empty() && !suffixes.contains(&suffix) {
                suffixes.push(suffix);
            }
        }
        self.suffixes = suffixes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_keeps_order() {
        let config = MatcherConfig::with_suffixes(["Xml", ".json", "", "xml"]);
        assert_eq!(config.suffixes, vec!["xml", "json"]);
    }

    #[test]
    fn test_precedence_from_json() {
        let config: MatcherConfig =
            serde_json::from_str(r#"{"precedence": "fewest_wildcards"}"#).unwrap();
        assert_eq!(config.precedence, Precedence::FewestWildcards);
        assert!(config.suffixes.is_empty());
    }
}
