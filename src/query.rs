//! Query keys and list/page query parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Get,
    All,
    Paginated,
}

impl Operation {
    pub fn is_list(self) -> bool {
        matches!(self, Operation::All | Operation::Paginated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::All => "all",
            Operation::Paginated => "paginated",
        }
    }
}

/// `(prefix, operation, params)`. `params` is the serialized query, so two
/// logical queries that differ in any field get different keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub prefix: String,
    pub operation: Operation,
    params: String,
}

impl QueryKey {
    pub fn new(prefix: &str, operation: Operation, params: &Value) -> Self {
        Self {
            prefix: prefix.to_string(),
            operation,
            params: params.to_string(),
        }
    }

    pub fn get(prefix: &str, id: &str) -> Self {
        Self::new(prefix, Operation::Get, &Value::String(id.to_string()))
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    /// The id of a `get` key.
    pub fn id(&self) -> Option<String> {
        if self.operation != Operation::Get {
            return None;
        }
        serde_json::from_str::<Value>(&self.params)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.prefix, self.operation.as_str(), self.params)
    }
}

/// Which entries of one prefix an invalidation removes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyFilter {
    Everything,
    Lists,
    Ids(Vec<String>),
    IdsAndLists(Vec<String>),
}

impl KeyFilter {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            KeyFilter::Everything => true,
            KeyFilter::Lists => key.operation.is_list(),
            KeyFilter::Ids(ids) => key.id().map(|id| ids.contains(&id)).unwrap_or(false),
            KeyFilter::IdsAndLists(ids) => {
                key.operation.is_list() || key.id().map(|id| ids.contains(&id)).unwrap_or(false)
            }
        }
    }
}

/// One page request. `sort` and `filter` are encoded by the filter/sort UI and
/// passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_index: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl PageQuery {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
            sort: None,
            filter: None,
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn next(&self) -> Self {
        Self {
            page_index: self.page_index.saturating_add(1),
            ..self.clone()
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("pageIndex".to_string(), self.page_index.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.clone()));
        }
        params
    }
}

/// Options for fetching a whole (small) collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ListOptions {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.clone()));
        }
        params
    }
}
