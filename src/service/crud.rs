//! Generic CRUD operations over one backend collection, with cache reads and
//! prefix-scoped invalidation after every successful mutation.

use crate::cache::Fetch;
use crate::config::ResourceDescriptor;
use crate::error::{ApiError, ClientError};
use crate::query::{KeyFilter, ListOptions, Operation, PageQuery, QueryKey};
use crate::response::{decode_many, decode_one, Page};
use crate::service::FormSchema;
use crate::state::DataContext;
use crate::transport::{ApiRequest, Method};
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The operations the factory builds for one resource. Every method returns
/// the normalized [`ApiError`] on failure; transport errors never escape.
pub struct Resource<T> {
    ctx: DataContext,
    descriptor: Arc<ResourceDescriptor>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            descriptor: Arc::clone(&self.descriptor),
            _entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl<T: DeserializeOwned> Resource<T> {
    pub(crate) fn new(ctx: DataContext, descriptor: ResourceDescriptor) -> Self {
        Self {
            ctx,
            descriptor: Arc::new(descriptor),
            _entity: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    fn prefix(&self) -> &str {
        self.descriptor.prefix()
    }

    /// `POST {base}`. Invalidates list entries on success.
    pub async fn create<P>(&self, payload: &P) -> Result<T, ApiError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let result = self.try_create(payload).await;
        self.finish("create", result)
    }

    pub async fn create_validated<P>(&self, payload: &P, schema: &FormSchema<P>) -> Result<T, ApiError>
    where
        P: Serialize + Sync,
    {
        schema.validate(payload)?;
        self.create(payload).await
    }

    async fn try_create<P>(&self, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(payload)?;
        let request = ApiRequest::new(Method::Post, self.descriptor.collection_path()).with_body(body);
        let response = self.send(request).await?;
        self.ctx.cache.invalidate(self.prefix(), &KeyFilter::Lists);
        Ok(decode_one(response)?)
    }

    /// `GET {base}/{id}`, served from cache while fresh.
    pub async fn get_by_id<I>(&self, id: I) -> Result<T, ApiError>
    where
        I: fmt::Display,
    {
        let id = id.to_string();
        let path = self.item_path(&id)?;
        let key = QueryKey::get(self.prefix(), &id);
        let request = ApiRequest::new(Method::Get, path);
        let result = self.cached_read(key, request, decode_one).await;
        self.finish("get", result)
    }

    /// `GET {base}` without paging. Meant for small reference lists.
    pub async fn get_all(&self, options: &ListOptions) -> Result<Vec<T>, ApiError> {
        let result = self.try_get_all(options).await;
        self.finish("get_all", result)
    }

    async fn try_get_all(&self, options: &ListOptions) -> Result<Vec<T>, ClientError> {
        let key = QueryKey::new(self.prefix(), Operation::All, &serde_json::to_value(options)?);
        let request = ApiRequest::new(Method::Get, self.descriptor.collection_path())
            .with_query(options.to_params());
        self.cached_read(key, request, decode_many).await
    }

    /// `GET {base}?pageIndex=&pageSize=[&sort=][&filter=]`.
    pub async fn get_paginated(&self, query: &PageQuery) -> Result<Page<T>, ApiError> {
        if query.page_size == 0 {
            return Err(page_size_error());
        }
        let result = self.try_get_paginated(query).await;
        self.finish("get_paginated", result)
    }

    async fn try_get_paginated(&self, query: &PageQuery) -> Result<Page<T>, ClientError> {
        let key = QueryKey::new(self.prefix(), Operation::Paginated, &serde_json::to_value(query)?);
        let request = ApiRequest::new(Method::Get, self.descriptor.collection_path())
            .with_query(query.to_params());
        let (index, size) = (query.page_index, query.page_size);
        self.cached_read(key, request, |body| Page::decode(body, index, size))
            .await
    }

    /// Fetch a page into the cache ahead of navigation.
    pub async fn prefetch_paginated(&self, query: &PageQuery) -> Result<(), ApiError> {
        self.get_paginated(query).await.map(|_| ())
    }

    /// `PUT {base}/{id}`. Invalidates the record and all list entries on success.
    pub async fn update_by_id<I, P>(&self, id: I, payload: &P) -> Result<T, ApiError>
    where
        I: fmt::Display,
        P: Serialize + Sync + ?Sized,
    {
        let id = id.to_string();
        let path = self.item_path(&id)?;
        let result = self.try_update(&id, path, payload).await;
        self.finish("update", result)
    }

    pub async fn update_validated<I, P>(
        &self,
        id: I,
        payload: &P,
        schema: &FormSchema<P>,
    ) -> Result<T, ApiError>
    where
        I: fmt::Display,
        P: Serialize + Sync,
    {
        schema.validate(payload)?;
        self.update_by_id(id, payload).await
    }

    async fn try_update<P>(&self, id: &str, path: String, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(payload)?;
        let request = ApiRequest::new(Method::Put, path).with_body(body);
        let response = self.send(request).await?;
        self.invalidate_ids(vec![id.to_string()]);
        Ok(decode_one(response)?)
    }

    /// `DELETE {base}/{id}`. Same invalidation surface as update.
    pub async fn delete_by_id<I>(&self, id: I) -> Result<(), ApiError>
    where
        I: fmt::Display,
    {
        let id = id.to_string();
        let path = self.item_path(&id)?;
        let request = ApiRequest::new(Method::Delete, path);
        let result = self.send(request).await.map(|_| {
            self.invalidate_ids(vec![id]);
        });
        self.finish("delete", result)
    }

    /// Delete several records: one bulk request when both the descriptor and
    /// the transport allow it, otherwise single deletes with bounded concurrency.
    pub async fn delete_many<I>(&self, ids: &[I]) -> Result<(), ApiError>
    where
        I: Serialize + fmt::Display + Sync,
    {
        if ids.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let paths = keys
            .iter()
            .map(|id| self.item_path(id))
            .collect::<Result<Vec<_>, _>>()?;
        let result = if self.descriptor.bulk_delete && self.ctx.transport.supports_bulk_delete() {
            self.bulk_delete(ids, keys).await
        } else {
            self.delete_each(keys.into_iter().zip(paths).collect()).await
        };
        self.finish("delete_many", result)
    }

    async fn bulk_delete<I>(&self, ids: &[I], keys: Vec<String>) -> Result<(), ClientError>
    where
        I: Serialize + Sync,
    {
        let body = json!({ "ids": serde_json::to_value(ids)? });
        let request = ApiRequest::new(Method::Delete, self.descriptor.collection_path()).with_body(body);
        self.send(request).await?;
        self.invalidate_ids(keys);
        Ok(())
    }

    /// Single deletes for `(id, item path)` pairs. Ids that were deleted are
    /// invalidated even when others fail; the first failure is reported.
    async fn delete_each(&self, targets: Vec<(String, String)>) -> Result<(), ClientError> {
        let concurrency = self.ctx.config.delete_concurrency.max(1);
        let results: Vec<(String, Result<Value, ClientError>)> = stream::iter(targets)
            .map(|(id, path)| async move {
                let request = ApiRequest::new(Method::Delete, path);
                let result = self.send(request).await;
                (id, result)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut deleted = Vec::new();
        let mut first_error = None;
        for (id, result) in results {
            match result {
                Ok(_) => deleted.push(id),
                Err(e) => {
                    tracing::debug!(prefix = %self.prefix(), id = %id, error = %e, "delete failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        if !deleted.is_empty() {
            self.invalidate_ids(deleted);
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop every cached entry of this resource.
    pub fn invalidate_all(&self) -> usize {
        self.ctx.cache.invalidate(self.prefix(), &KeyFilter::Everything)
    }

    fn invalidate_ids(&self, ids: Vec<String>) {
        self.ctx.cache.invalidate(self.prefix(), &KeyFilter::IdsAndLists(ids));
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        tracing::debug!(method = %request.method, path = %request.path, "request");
        self.ctx.transport.send(request).await?.error_for_status()
    }

    /// Serve `key` from cache while fresh. Otherwise join the fetch already in
    /// flight for it, or issue one, decode it and store it unless an
    /// invalidation revoked the fetch in the meantime. A follower whose leader
    /// failed or was revoked starts over.
    async fn cached_read<R, D>(&self, key: QueryKey, request: ApiRequest, decode: D) -> Result<R, ClientError>
    where
        D: Fn(Value) -> Result<R, serde_json::Error>,
    {
        loop {
            if let Some(cached) = self.ctx.cache.lookup(&key) {
                return Ok(decode(cached)?);
            }
            let ticket = match self.ctx.cache.begin_fetch(&key) {
                Fetch::Lead(ticket) => ticket,
                Fetch::Follow(flight) => {
                    tracing::debug!(key = %key, "joining in-flight read");
                    match flight.wait().await {
                        Some(body) => return Ok(decode(body)?),
                        None => continue,
                    }
                }
            };
            tracing::debug!(key = %key, "cache miss");
            let body = match self.send(request.clone()).await {
                Ok(body) => body,
                Err(e) => {
                    self.ctx.cache.abandon(ticket);
                    return Err(e);
                }
            };
            return match decode(body.clone()) {
                Ok(value) => {
                    self.ctx.cache.complete_fetch(ticket, body);
                    Ok(value)
                }
                Err(e) => {
                    self.ctx.cache.abandon(ticket);
                    Err(e.into())
                }
            };
        }
    }

    fn finish<R>(&self, operation: &'static str, result: Result<R, ClientError>) -> Result<R, ApiError> {
        result.map_err(|e| {
            let err = ApiError::from(e);
            tracing::debug!(
                prefix = %self.prefix(),
                operation,
                kind = ?err.kind,
                message = %err.message,
                "operation failed"
            );
            err
        })
    }
}

impl<T> Resource<T> {
    /// Item path for `id`, refused locally when `id` is not a single path segment.
    fn item_path(&self, id: &str) -> Result<String, ApiError> {
        self.descriptor.item_path(id).ok_or_else(|| {
            let mut fields = BTreeMap::new();
            fields.insert("id".to_string(), format!("'{}' is not a valid record id", id));
            ApiError::validation(fields)
        })
    }
}

fn page_size_error() -> ApiError {
    let mut fields = BTreeMap::new();
    fields.insert("pageSize".to_string(), "pageSize must be at least 1".to_string());
    ApiError::validation(fields)
}
