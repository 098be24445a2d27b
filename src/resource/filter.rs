//! # Filter Expression AST
//!
//! Represents the query-string predicates a listing accepts: equality,
//! case-sensitive LIKE, and case-insensitive LIKE. Values arrive as raw
//! query-string text; equality coerces against the stored JSON value
//! (strings, numbers, booleans).

use serde_json::Value;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,

    /// Pattern match, case-sensitive (`%` and `_` wildcards)
    Like,

    /// Pattern match, case-insensitive
    ILike,
}

impl FilterOperator {
    /// Get the operator's query-string suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
        }
    }
}

/// A filter expression
#[derive(Debug, Clone)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Raw value to compare against
    pub value: String,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Check if a stored document matches this filter
    pub fn matches(&self, doc: &Value) -> bool {
        let field_value = match doc.get(&self.field) {
            Some(v) => v,
            None => return false,
        };

        match self.operator {
            FilterOperator::Eq => match field_value {
                Value::String(s) => s == &self.value,
                Value::Bool(b) => self.value == if *b { "true" } else { "false" },
                Value::Number(n) => self
                    .value
                    .parse::<f64>()
                    .map(|v| n.as_f64() == Some(v))
                    .unwrap_or(false),
                Value::Null => self.value == "null",
                _ => false,
            },
            FilterOperator::Like => field_value
                .as_str()
                .map(|s| like_match(s, &self.value))
                .unwrap_or(false),
            FilterOperator::ILike => field_value
                .as_str()
                .map(|s| like_match(&s.to_ascii_lowercase(), &self.value.to_ascii_lowercase()))
                .unwrap_or(false),
        }
    }
}

/// SQL LIKE matching: `%` is any sequence, `_` a single character
fn like_match(value: &str, pattern: &str) -> bool {
    fn rec(v: &[char], p: &[char]) -> bool {
        match p.first() {
            None => v.is_empty(),
            Some('%') => {
                if rec(v, &p[1..]) {
                    return true;
                }
                !v.is_empty() && rec(&v[1..], p)
            }
            Some('_') => !v.is_empty() && rec(&v[1..], &p[1..]),
            Some(c) => v.first() == Some(c) && rec(&v[1..], &p[1..]),
        }
    }

    let v: Vec<char> = value.chars().collect();
    let p: Vec<char> = pattern.chars().collect();
    rec(&v, &p)
}

/// A set of filters combined with AND logic
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: FilterExpr) {
        self.filters.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check if a document matches all filters
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_filter_string() {
        let filter = FilterExpr::eq("name", "Alice");

        assert!(filter.matches(&json!({"name": "Alice"})));
        assert!(!filter.matches(&json!({"name": "Bob"})));
        assert!(!filter.matches(&json!({"other": "Alice"})));
    }

    #[test]
    fn test_eq_filter_coercion() {
        let active = FilterExpr::eq("active", "true");
        assert!(active.matches(&json!({"active": true})));
        assert!(!active.matches(&json!({"active": false})));

        let year = FilterExpr::eq("year", "1984");
        assert!(year.matches(&json!({"year": 1984})));
        assert!(!year.matches(&json!({"year": 1985})));
    }

    #[test]
    fn test_eq_filter_distinguishes_booleans_from_numbers() {
        let truthy = FilterExpr::eq("flag", "true");
        assert!(truthy.matches(&json!({"flag": true})));
        assert!(!truthy.matches(&json!({"flag": 1})));

        let one = FilterExpr::eq("flag", "1");
        assert!(one.matches(&json!({"flag": 1})));
        assert!(!one.matches(&json!({"flag": true})));
    }

    #[test]
    fn test_like_filter_is_case_sensitive() {
        let filter = FilterExpr::new("name", FilterOperator::Like, "%son");

        assert!(filter.matches(&json!({"name": "Johnson"})));
        assert!(filter.matches(&json!({"name": "Wilson"})));
        assert!(!filter.matches(&json!({"name": "JohnSON"})));
        assert!(!filter.matches(&json!({"name": "Smith"})));
    }

    #[test]
    fn test_ilike_filter_ignores_case() {
        let filter = FilterExpr::new("name", FilterOperator::ILike, "%SON");

        assert!(filter.matches(&json!({"name": "Johnson"})));
        assert!(filter.matches(&json!({"name": "JOHNSON"})));
        assert!(!filter.matches(&json!({"name": "Smith"})));
    }

    #[test]
    fn test_like_single_char_wildcard() {
        let filter = FilterExpr::new("code", FilterOperator::Like, "a_c");

        assert!(filter.matches(&json!({"code": "abc"})));
        assert!(!filter.matches(&json!({"code": "ac"})));
        assert!(!filter.matches(&json!({"code": "abbc"})));
    }

    #[test]
    fn test_filter_set() {
        let filters = FilterSet::new()
            .and(FilterExpr::eq("active", "true"))
            .and(FilterExpr::new("name", FilterOperator::Like, "J%"));

        assert!(filters.matches(&json!({"active": true, "name": "Jane"})));
        assert!(!filters.matches(&json!({"active": false, "name": "Jane"})));
        assert!(!filters.matches(&json!({"active": true, "name": "Bob"})));
    }
}
