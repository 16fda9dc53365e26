//! `+key=value` runtime arguments.

use vigil_common::parse_u32_literal;

use crate::error::ConfigError;

/// Parsed plusargs, in command-line order.
///
/// A key given more than once resolves to its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plusargs {
    entries: Vec<(String, Option<String>)>,
}

impl Plusargs {
    /// Parses `+key=value` and bare `+flag` tokens.
    ///
    /// Any token without a leading `+`, or with an empty key, is rejected.
    pub fn parse<I, S>(tokens: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            let bad = |reason: &str| ConfigError::Plusarg {
                token: token.to_string(),
                reason: reason.to_string(),
            };
            let body = token
                .strip_prefix('+')
                .ok_or_else(|| bad("expected a leading '+'"))?;
            let (key, value) = match body.split_once('=') {
                Some((k, v)) => (k, Some(v.to_string())),
                None => (body, None),
            };
            if key.is_empty() {
                return Err(bad("empty key"));
            }
            entries.push((key.to_string(), value));
        }
        tracing::debug!(count = entries.len(), "parsed plusargs");
        Ok(Self { entries })
    }

    /// Returns `true` if `key` was given, with or without a value.
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// The value of `key`; `None` if absent or given as a bare flag.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// The value of `key` parsed as a decimal or `0x` hex literal.
    pub fn get_u32(&self, key: &str) -> Result<Option<u32>, ConfigError> {
        self.get(key)
            .map(|v| {
                parse_u32_literal(v).map_err(|e| ConfigError::Plusarg {
                    token: format!("+{key}={v}"),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// Appends every entry of `other`, so its values take precedence.
    pub fn extend(&mut self, other: &Plusargs) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Iterates `(key, value)` pairs in the order given.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no plusargs were given.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_values_and_flags() {
        let args = Plusargs::parse(["+seed0=0x10", "+dump", "+plusargs_test_key=abc"]).unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args.get("plusargs_test_key"), Some("abc"));
        assert!(args.has("dump"));
        assert_eq!(args.get("dump"), None);
        assert_eq!(args.get_u32("seed0").unwrap(), Some(16));
        assert_eq!(args.get_u32("missing").unwrap(), None);
    }

    #[test]
    fn last_value_wins() {
        let args = Plusargs::parse(["+cycles=4", "+cycles=8"]).unwrap();
        assert_eq!(args.get_u32("cycles").unwrap(), Some(8));
    }

    #[test]
    fn empty_value_is_kept() {
        let args = Plusargs::parse(["+name="]).unwrap();
        assert_eq!(args.get("name"), Some(""));
    }

    #[test]
    fn rejects_missing_plus() {
        let err = Plusargs::parse(["seed0=1"]).unwrap_err();
        assert!(matches!(err, ConfigError::Plusarg { .. }));
    }

    #[test]
    fn rejects_empty_key() {
        assert!(Plusargs::parse(["+=5"]).is_err());
        assert!(Plusargs::parse(["+"]).is_err());
    }

    #[test]
    fn bad_number() {
        let args = Plusargs::parse(["+seed1=banana"]).unwrap();
        let err = args.get_u32("seed1").unwrap_err();
        assert!(err.to_string().contains("+seed1=banana"));
    }

    #[test]
    fn extend_overrides() {
        let mut a = Plusargs::parse(["+x=1"]).unwrap();
        a.extend(&Plusargs::parse(["+x=2"]).unwrap());
        assert_eq!(a.get("x"), Some("2"));
        assert_eq!(a.iter().count(), 2);
    }
}
