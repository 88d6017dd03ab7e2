use crate::config::Config;
use crate::services::cache::CacheStore;
use crate::upstream::Upstream;

/// Shared by every request handler.
pub struct AppState {
    pub config: Config,
    pub cache: Box<dyn CacheStore>,
    pub upstream: Box<dyn Upstream>,
}

impl AppState {
    /// Upstream path under the configured shard, e.g. `/shards/steam/seasons`.
    pub fn shard_path(&self, path: &str) -> String {
        format!("/shards/{}{}", self.config.shard, path)
    }

    /// Cache key namespaced by data kind and shard.
    pub fn cache_key(&self, kind: &str, parts: &[&str]) -> String {
        let mut key = format!("{}:{}", kind, self.config.shard);
        for part in parts {
            key.push(':');
            key.push_str(part);
        }
        key
    }
}
