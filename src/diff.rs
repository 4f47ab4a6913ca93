//! Set differences between two parsed env mappings.

use crate::parser::EnvMapping;
use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
/// A key present in both files whose values differ.
pub struct ChangedValue {
    pub key: String,
    pub source_value: String,
    pub target_value: String,
}

#[derive(Serialize, Clone, Debug, Default)]
/// Result of diffing a source mapping (usually the example file) against a
/// target mapping (usually the live env file).
pub struct DiffResult {
    /// Keys in source absent from target, in source key order.
    pub missing_in_target: Vec<String>,
    /// Keys in target absent from source, in target key order.
    pub extra_in_target: Vec<String>,
    /// Keys present in both with differing values, in source key order.
    pub changed_values: Vec<ChangedValue>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.missing_in_target.is_empty()
            && self.extra_in_target.is_empty()
            && self.changed_values.is_empty()
    }
}

/// Compute the asymmetric diff of `source` against `target`.
///
/// Values are compared by exact string equality; the parser already trimmed
/// both sides, so no normalization happens here. Pure and O(n+m).
pub fn diff(source: &EnvMapping, target: &EnvMapping) -> DiffResult {
    let mut result = DiffResult::default();
    for (key, source_value) in source.iter() {
        match target.get(key) {
            None => result.missing_in_target.push(key.to_string()),
            Some(target_value) if target_value != source_value => {
                result.changed_values.push(ChangedValue {
                    key: key.to_string(),
                    source_value: source_value.to_string(),
                    target_value: target_value.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    for key in target.keys() {
        if !source.contains_key(key) {
            result.extra_in_target.push(key.to_string());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_missing_extra_changed() {
        let source = EnvMapping::parse("A=1\nB=2\nC=3");
        let target = EnvMapping::parse("B=2\nC=9\nD=4");
        let d = diff(&source, &target);
        assert_eq!(d.missing_in_target, vec!["A"]);
        assert_eq!(d.extra_in_target, vec!["D"]);
        assert_eq!(d.changed_values.len(), 1);
        assert_eq!(d.changed_values[0].key, "C");
        assert_eq!(d.changed_values[0].source_value, "3");
        assert_eq!(d.changed_values[0].target_value, "9");
    }

    #[test]
    fn test_diff_is_asymmetric() {
        let a = EnvMapping::parse("ONLY_A=1\nSHARED=x");
        let b = EnvMapping::parse("ONLY_B=2\nSHARED=x");
        let ab = diff(&a, &b);
        let ba = diff(&b, &a);
        assert_eq!(ab.missing_in_target, vec!["ONLY_A"]);
        assert_eq!(ab.extra_in_target, vec!["ONLY_B"]);
        assert_eq!(ba.missing_in_target, vec!["ONLY_B"]);
        assert_eq!(ba.extra_in_target, vec!["ONLY_A"]);
    }

    #[test]
    fn test_diff_self_is_empty() {
        let a = EnvMapping::parse("A=1\nB=\nC=three words");
        let d = diff(&a, &a);
        assert!(d.is_empty());
    }

    #[test]
    fn test_diff_no_value_normalization() {
        // Quoted and unquoted forms are different values.
        let source = EnvMapping::parse("NAME=\"app\"");
        let target = EnvMapping::parse("NAME=app");
        let d = diff(&source, &target);
        assert_eq!(d.changed_values.len(), 1);
    }
}
