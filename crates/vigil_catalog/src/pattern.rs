//! Module-path and signal-name matching.

use regex::Regex;

use crate::error::CatalogError;

/// Returns `true` if `query` names `path` or a suffix of its hierarchy.
///
/// Both are `.`-separated. The query matches when its segments equal the
/// trailing segments of the path, so `b.c` matches `a.b.c` but not `a.bc` or
/// `b.c.d`. An empty query matches every path.
pub fn module_matches(path: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let path_segs: Vec<&str> = path.split('.').collect();
    let query_segs: Vec<&str> = query.split('.').collect();
    if query_segs.len() > path_segs.len() {
        return false;
    }
    path_segs[path_segs.len() - query_segs.len()..] == query_segs[..]
}

/// A compiled signal-name glob.
///
/// `*` matches any run of characters and `?` exactly one; everything else is
/// literal. A pattern without wildcards matches only the identical name.
#[derive(Debug, Clone)]
pub struct SignalPattern {
    source: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact,
    Glob(Regex),
}

impl SignalPattern {
    /// Compiles a glob pattern.
    pub fn new(pattern: &str) -> Result<Self, CatalogError> {
        if !pattern.contains(['*', '?']) {
            return Ok(Self {
                source: pattern.to_string(),
                matcher: Matcher::Exact,
            });
        }
        let mut re = String::with_capacity(pattern.len() + 8);
        re.push('^');
        let mut literal = String::new();
        for c in pattern.chars() {
            match c {
                '*' | '?' => {
                    re.push_str(&regex::escape(&literal));
                    literal.clear();
                    re.push_str(if c == '*' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        re.push_str(&regex::escape(&literal));
        re.push('$');
        let regex = Regex::new(&re).map_err(|e| CatalogError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            matcher: Matcher::Glob(regex),
        })
    }

    /// Tests a signal name against the pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Exact => self.source == name,
            Matcher::Glob(re) => re.is_match(name),
        }
    }

    /// Returns `true` if the pattern contains wildcards.
    pub fn is_glob(&self) -> bool {
        matches!(self.matcher, Matcher::Glob(_))
    }

    /// The original pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}
