use crate::error::AppError;
use async_trait::async_trait;
use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Key-scoped storage for cached values. Entries past their TTL read as absent.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), AppError>;
}

/// Returns the cached value for `key`, or runs `producer` once and caches its
/// result for `ttl`.
///
/// Store failures never fail the call: an unreadable entry counts as a miss
/// and a failed write still hands back the produced value. Overlapping calls
/// for the same key may each run their producer.
pub async fn wrap_fetch<T, F, Fut>(
    store: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    producer: F,
) -> Result<T, AppError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    match store.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                tracing::debug!(key, "cache hit");
                return Ok(value);
            }
            Err(err) => tracing::warn!(key, error = %err, "discarding undecodable cache entry"),
        },
        Ok(None) => tracing::debug!(key, "cache miss"),
        Err(err) => tracing::warn!(key, error = %err, "cache read failed"),
    }

    let value = producer().await?;

    match serde_json::to_vec(&value) {
        Ok(bytes) => {
            if let Err(err) = store.set(key, &bytes, ttl).await {
                tracing::warn!(key, error = %err, "cache write failed");
            }
        }
        Err(err) => tracing::warn!(key, error = %err, "value not cacheable"),
    }

    Ok(value)
}

/// Runs `fetch_one` for every id concurrently and keeps the ones that resolve,
/// in id order.
///
/// A failing id is logged and dropped. When no id resolves at all the batch is
/// reported as `NotFound` rather than an empty success.
pub async fn fetch_all<T, F, Fut>(ids: &[String], fetch_one: F) -> Result<Vec<T>, AppError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let outcomes = join_all(ids.iter().map(|id| fetch_one(id.clone()))).await;

    let resolved: Vec<T> = ids
        .iter()
        .zip(outcomes)
        .filter_map(|(id, outcome)| match outcome {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "batch entry degraded to absent");
                None
            }
        })
        .collect();

    if resolved.is_empty() && !ids.is_empty() {
        return Err(AppError::NotFound(format!(
            "none of the {} requested entries could be fetched",
            ids.len()
        )));
    }

    Ok(resolved)
}
