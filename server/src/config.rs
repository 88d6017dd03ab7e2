use std::str::FromStr;
use std::time::Duration;

const DAY_SECS: u64 = 24 * 60 * 60;

/// Validity windows for each kind of cached upstream data.
#[derive(Debug, Clone)]
pub struct CacheTtl {
    pub seasons: Duration,
    pub season_stats: Duration,
    pub player: Duration,
    /// Finished matches never change upstream.
    pub matches: Duration,
    pub telemetry: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        CacheTtl {
            seasons: Duration::from_secs(3 * DAY_SECS),
            season_stats: Duration::from_secs(10 * 60),
            player: Duration::from_secs(5 * 60),
            matches: Duration::from_secs(14 * DAY_SECS),
            telemetry: Duration::from_secs(14 * DAY_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub api_key: Option<String>,
    pub api_base: String,
    pub shard: String,
    pub request_timeout: Duration,
    pub max_batch_matches: usize,
    pub ttl: CacheTtl,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".into(),
            port: 8080,
            database_path: "pubg-cache.db".into(),
            api_key: None,
            api_base: "https://api.pubg.com".into(),
            shard: "steam".into(),
            request_timeout: Duration::from_secs(10),
            max_batch_matches: 10,
            ttl: CacheTtl::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let ttl = CacheTtl {
            seasons: env_secs("CACHE_TTL_SEASONS_SECS", defaults.ttl.seasons),
            season_stats: env_secs("CACHE_TTL_SEASON_STATS_SECS", defaults.ttl.season_stats),
            player: env_secs("CACHE_TTL_PLAYER_SECS", defaults.ttl.player),
            matches: env_secs("CACHE_TTL_MATCH_SECS", defaults.ttl.matches),
            telemetry: env_secs("CACHE_TTL_TELEMETRY_SECS", defaults.ttl.telemetry),
        };

        let api_key = std::env::var("PUBG_API_KEY").ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("PUBG_API_KEY is not set; upstream API requests will be rejected");
        }

        Config {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port),
            database_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            api_key,
            api_base: std::env::var("PUBG_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            shard: std::env::var("PUBG_SHARD").unwrap_or(defaults.shard),
            request_timeout: env_secs("PUBG_TIMEOUT_SECS", defaults.request_timeout),
            max_batch_matches: env_parse("MAX_BATCH_MATCHES", defaults.max_batch_matches).max(1),
            ttl,
        }
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(var = name, value = %raw, "ignoring unparseable setting");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_secs(name: &str, default: Duration) -> Duration {
    Duration::from_secs(env_parse(name, default.as_secs()))
}
