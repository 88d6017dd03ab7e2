//! HTTP access to the PUBG developer API and its telemetry CDN.

use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};

const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Fetch capability consumed by the services.
///
/// A relative `uri` (starting with `/`) addresses the authenticated API;
/// anything else is treated as an absolute URL.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, AppError>;
}

pub struct HttpUpstream {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl HttpUpstream {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .gzip(true)
            .build()?;
        Ok(HttpUpstream {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, AppError> {
        let request = if uri.starts_with('/') {
            let mut request = self
                .client
                .get(format!("{}{}", self.api_base, uri))
                .header(ACCEPT, JSON_API_MEDIA_TYPE);
            if let Some(key) = &self.api_key {
                request = request.header(AUTHORIZATION, format!("Bearer {}", key));
            }
            request
        } else {
            self.client.get(uri)
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(uri, status = status.as_u16(), "upstream request rejected");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                uri: uri.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use std::collections::HashMap;

    /// Serves canned bodies by URI and answers 404 for everything else.
    #[derive(Default)]
    pub struct StubUpstream {
        bodies: HashMap<String, Vec<u8>>,
    }

    impl StubUpstream {
        pub fn with(mut self, uri: &str, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(uri.to_string(), body.into());
            self
        }
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        async fn fetch(&self, uri: &str) -> Result<Vec<u8>, AppError> {
            self.bodies.get(uri).cloned().ok_or_else(|| AppError::Upstream {
                status: 404,
                uri: uri.to_string(),
            })
        }
    }
}
