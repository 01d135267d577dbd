//! Resource descriptors: one backend collection and its cache namespace.

use std::borrow::Cow;

/// Collection path under the versioned API root, usable in `const` descriptors.
#[macro_export]
macro_rules! api_path {
    ($segment:literal) => {
        concat!("/api/v1/", $segment)
    };
}

/// Static description of one backend collection. Domain modules declare theirs
/// as a `const`; nothing mutates a descriptor after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Collection path, e.g. `/api/v1/payment-types`.
    pub base_url: Cow<'static, str>,
    /// First element of every query key owned by this resource.
    pub cache_key_prefix: Cow<'static, str>,
    /// Whether the backend accepts `DELETE {base_url}` with `{"ids": [...]}`.
    pub bulk_delete: bool,
}

impl ResourceDescriptor {
    pub const fn new(base_url: &'static str, cache_key_prefix: &'static str) -> Self {
        Self {
            base_url: Cow::Borrowed(base_url),
            cache_key_prefix: Cow::Borrowed(cache_key_prefix),
            bulk_delete: true,
        }
    }

    /// Descriptor built at runtime, e.g. from a plugin manifest.
    pub fn owned(base_url: impl Into<String>, cache_key_prefix: impl Into<String>) -> Self {
        Self {
            base_url: Cow::Owned(base_url.into()),
            cache_key_prefix: Cow::Owned(cache_key_prefix.into()),
            bulk_delete: true,
        }
    }

    pub fn without_bulk_delete(mut self) -> Self {
        self.bulk_delete = false;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.cache_key_prefix
    }

    pub fn collection_path(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `{base}/{id}`, or `None` when `id` would not stay a single path segment.
    pub fn item_path(&self, id: &str) -> Option<String> {
        is_path_segment(id).then(|| format!("{}/{}", self.collection_path(), id))
    }
}

/// Ids are spliced into paths verbatim, so anything that could change the route is refused.
pub fn is_path_segment(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id.chars().all(|c| {
            !c.is_control() && !c.is_whitespace() && !matches!(c, '/' | '\\' | '?' | '#' | '%')
        })
}
