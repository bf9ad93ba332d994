//! Request matching against a compiled [`RouteTable`].
//!
//! Lookup runs in three steps:
//!
//! 1. exact match of the path as literal segments;
//! 2. if the path ends with `.{suffix}` for a known suffix (first one wins),
//!    exact match of the stripped path, which must allow that suffix;
//! 3. wildcard search: segments are reversed and subsets of positions are
//!    replaced with wildcards, tried in [`Precedence`] order until a
//!    (pattern, verb) key hits.
//!
//! A suffix recognized in step 2 stays bound through step 3, and a route that
//! does not allow it rejects the request instead of letting the search go on.

use tracing::trace;

use crate::config::Precedence;
use crate::entry::{MatchedRoute, RouteEntry};
use crate::method::{Method, PathParams};
use crate::path::{split_segments, RoutePattern, Segment};
use crate::table::{RouteTable, MAX_WILDCARD_DEPTH};

/// Stateless route matcher.
///
/// ```
/// use portico_router::{ClassDeclaration, Matcher, Method, Precedence, RouteDeclaration, RouteTable};
///
/// let table = RouteTable::compile([ClassDeclaration::new("Doc")
///     .verbs(["GET"])
///     .suffixes(["json"])
///     .route(RouteDeclaration::new("show", "docs/{slug}"))])
/// .unwrap();
///
/// let matcher = Matcher::new(Precedence::Legacy);
/// let suffixes = vec!["json".to_string()];
/// let matched = matcher.find(&table, "/docs/intro.json", &Method::Get, &suffixes).unwrap();
/// assert_eq!(matched.suffix(), Some("json"));
/// assert_eq!(matched.params.get("slug"), Some("intro"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matcher {
    precedence: Precedence,
}

impl Matcher {
    /// Creates a matcher with the given subset ordering.
    #[must_use]
    pub const fn new(precedence: Precedence) -> Self {
        Self { precedence }
    }

    /// Subset ordering in use.
    #[must_use]
    pub const fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Resolves `path` and `verb` to a route, or `None` when nothing matches.
    ///
    /// `suffixes` are read the way [`MatcherConfig`](crate::MatcherConfig)
    /// normalizes them: surrounding whitespace and one leading `.` are
    /// ignored and letters compare lower-cased, so `"JSON"` and `".json"`
    /// both recognize `/users/42.json`. The path itself stays
    /// case-sensitive.
    #[must_use]
    pub fn find<'a>(
        &self,
        table: &'a RouteTable,
        path: &str,
        verb: &Method,
        suffixes: &[String],
    ) -> Option<MatchedRoute<'a>> {
        if let Some(entry) = table.get(&RoutePattern::literal(path), verb) {
            return Some(MatchedRoute::exact(entry));
        }

        let mut path = path;
        let mut suffix = None;
        if let Some((stripped, candidate)) = strip_known_suffix(path, suffixes) {
            if let Some(entry) = table.get(&RoutePattern::literal(stripped), verb) {
                if !entry.allows_suffix(candidate) {
                    trace!(path, suffix = candidate, route = %entry.pattern, "suffix not allowed");
                    return None;
                }
                return Some(MatchedRoute {
                    entry,
                    suffix: Some(candidate.to_string()),
                    params: PathParams::new(),
                });
            }
            path = stripped;
            suffix = Some(candidate);
        }

        let reversed: Vec<&str> = split_segments(path).rev().collect();
        let (entry, mask) = self.search(table, &reversed, verb)?;

        if let Some(candidate) = suffix {
            if !entry.allows_suffix(candidate) {
                trace!(path, suffix = candidate, route = %entry.pattern, "suffix not allowed");
                return None;
            }
        }

        Some(MatchedRoute {
            entry,
            suffix: suffix.map(str::to_string),
            params: bind_params(entry, &reversed, mask),
        })
    }

    /// Tries wildcard subsets of `reversed` and returns the first hit with
    /// the subset that produced it.
    fn search<'a>(
        &self,
        table: &'a RouteTable,
        reversed: &[&str],
        verb: &Method,
    ) -> Option<(&'a RouteEntry, u64)> {
        if reversed.is_empty() || reversed.len() > MAX_WILDCARD_DEPTH {
            return None;
        }
        // Only positions some same-length pattern has a wildcard at can hit;
        // walking submasks of that union keeps the ascending order intact.
        let allowed = table.wildcard_mask(reversed.len())?;
        if allowed == 0 {
            return None;
        }

        let lookup = |mask: u64| {
            table
                .get(&wildcard_pattern(reversed, mask), verb)
                .map(|entry| (entry, mask))
        };

        match self.precedence {
            Precedence::Legacy => submasks(allowed).find_map(lookup),
            Precedence::FewestWildcards => submasks_by_popcount(allowed).find_map(lookup),
        }
    }
}

/// Returns the stripped path and the first known suffix it ends with.
///
/// Known suffixes are compared trimmed, without a leading `.` and
/// lower-cased; the returned suffix is the matching tail of `path`.
fn strip_known_suffix<'p>(path: &'p str, suffixes: &[String]) -> Option<(&'p str, &'p str)> {
    suffixes.iter().find_map(|suffix| {
        let suffix = suffix.trim();
        let suffix = suffix.strip_prefix('.').unwrap_or(suffix);
        if suffix.is_empty() {
            return None;
        }
        let split = path.len().checked_sub(suffix.len())?;
        let tail = path.get(split..)?;
        if !tail.bytes().eq(suffix.bytes().map(|b| b.to_ascii_lowercase())) {
            return None;
        }
        let stripped = path.get(..split)?.strip_suffix('.')?;
        Some((stripped, tail))
    })
}

/// Non-empty submasks of `allowed`, in ascending order.
fn submasks(allowed: u64) -> impl Iterator<Item = u64> {
    let mut current = 0u64;
    std::iter::from_fn(move || {
        current = (current | !allowed).wrapping_add(1) & allowed;
        (current != 0).then_some(current)
    })
}

/// Non-empty submasks of `allowed`, fewest bits first and ascending within
/// each popcount.
///
/// Walks `k`-of-`n` combinations over the bits of `allowed` in compact form
/// (Gosper's hack) and spreads each onto those bits. The compact counter is
/// a `u128` so a full 64-bit `allowed` does not overflow.
fn submasks_by_popcount(allowed: u64) -> impl Iterator<Item = u64> {
    let width = allowed.count_ones();
    let limit = 1u128 << width;
    let mut ones = 1u32;
    let mut compact = 1u128;
    std::iter::from_fn(move || {
        if ones > width {
            return None;
        }
        let current = compact;
        let low = current | (current - 1);
        let next = (low + 1) | (((!low & (low + 1)) - 1) >> (current.trailing_zeros() + 1));
        if next < limit {
            compact = next;
        } else {
            ones += 1;
            compact = (1u128 << ones) - 1;
        }
        Some(deposit(current, allowed))
    })
}

/// Places the low bits of `compact` onto the set bits of `allowed`, lowest
/// first.
fn deposit(mut compact: u128, allowed: u64) -> u64 {
    let mut out = 0;
    let mut bits = allowed;
    while bits != 0 {
        if compact & 1 == 1 {
            out |= bits & bits.wrapping_neg();
        }
        compact >>= 1;
        bits &= bits - 1;
    }
    out
}

/// Rebuilds a left-to-right pattern from reversed segments, with the
/// positions set in `mask` turned into wildcards.
fn wildcard_pattern(reversed: &[&str], mask: u64) -> RoutePattern {
    let segments = reversed
        .iter()
        .enumerate()
        .rev()
        .map(|(pos, segment)| {
            if mask >> pos & 1 == 1 {
                Segment::Wildcard
            } else {
                Segment::Literal((*segment).to_string())
            }
        })
        .collect();
    RoutePattern::from_segments(segments)
}

/// Zips the captured segments, in path order, with the entry's names.
fn bind_params(entry: &RouteEntry, reversed: &[&str], mask: u64) -> PathParams {
    let mut captured: Vec<&str> = reversed
        .iter()
        .enumerate()
        .filter(|(pos, _)| mask >> pos & 1 == 1)
        .map(|(_, segment)| *segment)
        .collect();
    captured.reverse();

    let mut params = PathParams::new();
    if captured.len() != entry.param_names.len() {
        trace!(
            route = %entry.pattern,
            captured = captured.len(),
            expected = entry.param_names.len(),
            "parameter count mismatch; leaving params unbound"
        );
        return params;
    }
    for (name, value) in entry.param_names.iter().zip(captured) {
        params.insert(name.as_str(), value);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submasks_ascending() {
        assert_eq!(submasks(0b101).collect::<Vec<_>>(), vec![0b001, 0b100, 0b101]);
        assert_eq!(submasks(0b111).count(), 7);
        assert_eq!(submasks(0).count(), 0);
    }

    #[test]
    fn test_submasks_full_width() {
        assert_eq!(submasks(u64::MAX).take(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(submasks(1 << 63).collect::<Vec<_>>(), vec![1 << 63]);
    }

    #[test]
    fn test_wildcard_pattern_positions() {
        // "/a/b/c" reversed
        let reversed = ["c", "b", "a"];
        assert_eq!(wildcard_pattern(&reversed, 0b001).to_string(), "/a/b/{*}");
        assert_eq!(wildcard_pattern(&reversed, 0b010).to_string(), "/a/{*}/c");
        assert_eq!(wildcard_pattern(&reversed, 0b101).to_string(), "/{*}/b/{*}");
    }

    #[test]
    fn test_strip_known_suffix_first_wins() {
        let suffixes = vec!["gz".to_string(), "tar.gz".to_string()];
        assert_eq!(
            strip_known_suffix("/files/a.tar.gz", &suffixes),
            Some(("/files/a.tar", "gz"))
        );
        assert_eq!(strip_known_suffix("/files/agz", &suffixes), None);
        assert_eq!(strip_known_suffix("/files/a", &[String::new()]), None);
    }

    #[test]
    fn test_strip_known_suffix_normalizes_known_list() {
        let suffixes = vec!["JSON".to_string(), " .Xml ".to_string()];
        assert_eq!(
            strip_known_suffix("/users/42.json", &suffixes),
            Some(("/users/42", "json"))
        );
        assert_eq!(
            strip_known_suffix("/users/42.xml", &suffixes),
            Some(("/users/42", "xml"))
        );
        assert_eq!(strip_known_suffix("/users/42.JSON", &suffixes), None);
        assert_eq!(strip_known_suffix("json", &suffixes), None);
        assert_eq!(strip_known_suffix("/é", &["x".to_string()]), None);
    }

    #[test]
    fn test_submasks_by_popcount_order() {
        assert_eq!(
            submasks_by_popcount(0b111).collect::<Vec<_>>(),
            vec![0b001, 0b010, 0b100, 0b011, 0b101, 0b110, 0b111]
        );
        assert_eq!(
            submasks_by_popcount(0b1010).collect::<Vec<_>>(),
            vec![0b0010, 0b1000, 0b1010]
        );
        assert_eq!(submasks_by_popcount(0).count(), 0);
    }

    #[test]
    fn test_submasks_by_popcount_matches_sorted_submasks() {
        let allowed = 0b1011_0110;
        let mut expected: Vec<u64> = submasks(allowed).collect();
        expected.sort_by_key(|mask| (mask.count_ones(), *mask));
        assert_eq!(submasks_by_popcount(allowed).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_submasks_by_popcount_full_width() {
        let mut masks = submasks_by_popcount(u64::MAX);
        assert_eq!(masks.next(), Some(1));
        assert_eq!(masks.nth(62), Some(1 << 63));
        assert_eq!(masks.next(), Some(0b11));
        assert_eq!(submasks_by_popcount(1 << 63).collect::<Vec<_>>(), vec![1 << 63]);
    }
}
