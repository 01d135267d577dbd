//! Response envelopes and the paginated result.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{"data": ...}`. Bare bodies are accepted too: some endpoints return the
/// record itself.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub fn decode_one<T: DeserializeOwned>(body: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(unwrap_data(body))
}

pub fn decode_many<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, serde_json::Error> {
    serde_json::from_value(unwrap_data(body))
}

/// One page of a larger collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_page: u64,
    pub total_size: u64,
    pub page_size: u32,
    pub page_index: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    total_size: Option<u64>,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    page_index: Option<u32>,
    #[serde(default)]
    meta: Option<WireMeta>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMeta {
    #[serde(default)]
    total_size: Option<u64>,
    #[serde(default)]
    count: Option<u64>,
}

pub fn total_pages(total_size: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_size.div_ceil(page_size as u64)
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a page response for a request of `requested_size` rows at
    /// `requested_index`. Rows beyond the page size are dropped and
    /// `total_page` is derived from `total_size`, never taken from the wire.
    pub fn decode(
        body: Value,
        requested_index: u32,
        requested_size: u32,
    ) -> Result<Self, serde_json::Error> {
        let wire: WirePage = serde_json::from_value(body)?;
        let page_size = match wire.page_size {
            Some(n) if n > 0 => n.min(requested_size),
            _ => requested_size,
        };
        let mut rows = wire.data;
        if rows.len() > page_size as usize {
            tracing::warn!(
                rows = rows.len(),
                page_size,
                "page response longer than page size, truncating"
            );
            rows.truncate(page_size as usize);
        }
        let total_size = wire
            .total_size
            .or_else(|| wire.meta.as_ref().and_then(|m| m.total_size.or(m.count)))
            .unwrap_or(rows.len() as u64);
        let data = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Page {
            data,
            total_page: total_pages(total_size, page_size),
            total_size,
            page_size,
            page_index: wire.page_index.unwrap_or(requested_index),
        })
    }
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        (self.page_index as u64) + 1 >= self.total_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_unwrapping() {
        assert_eq!(unwrap_data(json!({ "data": { "id": 1 } })), json!({ "id": 1 }));
        assert_eq!(unwrap_data(json!({ "id": 1 })), json!({ "id": 1 }));
        let many: Vec<u32> = decode_many(json!({ "data": [1, 2], "meta": { "count": 2 } })).unwrap();
        assert_eq!(many, vec![1, 2]);
    }

    #[test]
    fn page_invariants_hold_for_bad_wire_data() {
        let body = json!({
            "data": [1, 2, 3, 4],
            "totalSize": 21,
            "totalPage": 99,
            "pageSize": 3
        });
        let page: Page<u32> = Page::decode(body, 0, 3).unwrap();
        assert_eq!(page.data, vec![1, 2, 3]);
        assert_eq!(page.total_page, 7);
        assert_eq!(page.total_size, 21);
        assert!(!page.is_last());
    }

    #[test]
    fn page_falls_back_to_meta_and_request() {
        let body = json!({ "data": [1], "meta": { "count": 11 } });
        let page: Page<u32> = Page::decode(body, 2, 5).unwrap();
        assert_eq!(page.page_size, 5);
        assert_eq!(page.page_index, 2);
        assert_eq!(page.total_page, 3);
        assert!(page.is_last());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
