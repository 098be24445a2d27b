//! # Query Parameter Parser
//!
//! Parses listing query strings into a [`FilterSet`]. The predicate syntax
//! puts the operator in the key: `field=value` (equality), `field.like=pat`,
//! `field.ilike=pat`. Fields are validated against the resource's filterable
//! allow-list before any query is built; unknown fields or operator
//! suffixes are a 400.

use std::collections::HashMap;

use super::errors::{ApiError, ApiResult};
use super::filter::{FilterExpr, FilterOperator, FilterSet};

/// Parse listing query parameters against a field allow-list
pub fn parse_filters(params: &HashMap<String, String>, allowed: &[&str]) -> ApiResult<FilterSet> {
    let mut set = FilterSet::new();

    for (key, value) in params {
        let (field, operator) = match key.rsplit_once('.') {
            Some((field, "like")) => (field, FilterOperator::Like),
            Some((field, "ilike")) => (field, FilterOperator::ILike),
            Some((_, suffix)) => {
                return Err(ApiError::BadRequest(format!(
                    "unknown filter operator: {}",
                    suffix
                )));
            }
            None => (key.as_str(), FilterOperator::Eq),
        };

        if !allowed.contains(&field) {
            return Err(ApiError::BadRequest(format!(
                "cannot filter on field: {}",
                field
            )));
        }

        set.push(FilterExpr::new(field, operator, value.clone()));
    }

    Ok(set)
}
