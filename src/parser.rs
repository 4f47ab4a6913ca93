//! Env-file parsing into an ordered key/value mapping.
//!
//! Parsing is deliberately forgiving: blank lines, comments, and lines
//! without `=` are skipped, never reported. Reporting malformed lines is
//! the linter's job.

use std::collections::HashMap;

/// Ordered mapping of env keys to values as parsed from one file.
///
/// Keys are case-sensitive and unique; a repeated key overwrites the value
/// in place so the mapping keeps first-seen order with last-wins values.
/// Values are stored literally: no type coercion and no quote stripping.
#[derive(Debug, Clone, Default)]
pub struct EnvMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl EnvMapping {
    /// Parse raw env-file text.
    ///
    /// Per line: trim, skip when empty, a `#` comment, or missing `=`.
    /// Otherwise split on the first `=` (values may contain `=`), trim both
    /// parts, and insert when the key is non-empty. Never fails.
    pub fn parse(raw: &str) -> EnvMapping {
        let mut vars = EnvMapping::default();
        for line in raw.split('\n') {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            vars.insert(key.to_string(), value.trim().to_string());
        }
        vars
    }

    fn insert(&mut self, key: String, value: String) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for EnvMapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let vars =
            EnvMapping::parse("APP_NAME=Laravel\nAPP_ENV=local\n# comment\n\nDB_HOST=127.0.0.1");
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.get("APP_NAME"), Some("Laravel"));
        assert_eq!(vars.get("APP_ENV"), Some("local"));
        assert_eq!(vars.get("DB_HOST"), Some("127.0.0.1"));
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let vars = EnvMapping::parse("DATABASE_URL=mysql://u:p@host?opt=1");
        assert_eq!(vars.get("DATABASE_URL"), Some("mysql://u:p@host?opt=1"));
    }

    #[test]
    fn test_parse_trims_key_and_value() {
        let vars = EnvMapping::parse("  FOO =  bar  ");
        assert_eq!(vars.get("FOO"), Some("bar"));
    }

    #[test]
    fn test_parse_keeps_quotes_and_strings_literally() {
        let vars = EnvMapping::parse("NAME=\"My App\"\nDEBUG=true\nPORT=8080");
        assert_eq!(vars.get("NAME"), Some("\"My App\""));
        assert_eq!(vars.get("DEBUG"), Some("true"));
        assert_eq!(vars.get("PORT"), Some("8080"));
    }

    #[test]
    fn test_parse_duplicate_key_last_wins_keeps_order() {
        let vars = EnvMapping::parse("A=1\nB=2\nA=3");
        assert_eq!(vars.get("A"), Some("3"));
        assert_eq!(vars.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_parse_skips_malformed_and_empty_key_lines() {
        let vars = EnvMapping::parse("NOEQUALS\n=value\nOK=1");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("OK"), Some("1"));
    }

    #[test]
    fn test_parse_empty_value_allowed() {
        let vars = EnvMapping::parse("EMPTY=");
        assert_eq!(vars.get("EMPTY"), Some(""));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let text = "A=1\n# c\nB=two words\nA=9";
        assert_eq!(EnvMapping::parse(text), EnvMapping::parse(text));
    }
}
