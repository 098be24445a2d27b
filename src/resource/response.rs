//! Response envelopes for generated endpoints.

use serde::Serialize;
use serde_json::Value;

/// A single item, optionally accompanied by a fresh view of the requester
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub data: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

impl ItemResponse {
    pub fn new(data: Value) -> Self {
        Self { data, user: None }
    }

    pub fn with_user(data: Value, user: Option<Value>) -> Self {
        Self { data, user }
    }
}

/// A listing
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<Value>,
}

impl ListResponse {
    pub fn new(data: Vec<Value>) -> Self {
        Self { data }
    }
}
