// ABOUTME: Address resolver that asks external "what is my IP" endpoints for the public addresses.
// ABOUTME: Each family resolves independently to a value, Disabled, or Error; lookups run concurrently.

use std::time::Duration;

use async_trait::async_trait;
use myipd_core::{AddressFamily, ResolvedAddress};
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ServerConfig;

/// Errors from a single outbound address lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Source of public addresses, one lookup per family.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Return the public address for a family, trimmed of trailing whitespace.
    async fn lookup(&self, family: AddressFamily) -> Result<String, LookupError>;
}

/// Looks addresses up over HTTP(S). The endpoint's body is trusted verbatim.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: reqwest::Client,
    ipv4_source: String,
    ipv6_source: String,
}

impl HttpLookup {
    /// Build a lookup whose every request is bounded by `timeout`.
    pub fn new(
        ipv4_source: impl Into<String>,
        ipv6_source: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("myipd/{}", myipd_core::VERSION))
            .build()
            .map_err(LookupError::Client)?;
        Ok(Self::with_client(client, ipv4_source, ipv6_source))
    }

    /// Use a preconfigured client. The client is responsible for its own timeout.
    pub fn with_client(
        client: reqwest::Client,
        ipv4_source: impl Into<String>,
        ipv6_source: impl Into<String>,
    ) -> Self {
        Self {
            client,
            ipv4_source: ipv4_source.into(),
            ipv6_source: ipv6_source.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, LookupError> {
        Self::new(
            config.ipv4_source.clone(),
            config.ipv6_source.clone(),
            config.lookup_timeout,
        )
    }

    fn source_for(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.ipv4_source,
            AddressFamily::V6 => &self.ipv6_source,
        }
    }
}

#[async_trait]
impl AddressLookup for HttpLookup {
    async fn lookup(&self, family: AddressFamily) -> Result<String, LookupError> {
        let url = self.source_for(family);

        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout { url: url.to_string() }
            } else {
                LookupError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout { url: url.to_string() }
            } else {
                LookupError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(body.trim_end().to_string())
    }
}

/// Resolve both families concurrently. A failure in one family never affects
/// the other.
pub async fn resolve(
    lookup: &dyn AddressLookup,
    enable_ipv4: bool,
    enable_ipv6: bool,
) -> (ResolvedAddress, ResolvedAddress) {
    tokio::join!(
        resolve_family(lookup, AddressFamily::V4, enable_ipv4),
        resolve_family(lookup, AddressFamily::V6, enable_ipv6),
    )
}

async fn resolve_family(
    lookup: &dyn AddressLookup,
    family: AddressFamily,
    enabled: bool,
) -> ResolvedAddress {
    if !enabled {
        return ResolvedAddress::Disabled;
    }
    match lookup.lookup(family).await {
        Ok(address) => ResolvedAddress::Value(address),
        Err(e) => {
            tracing::error!(%family, "address lookup failed: {}", e);
            ResolvedAddress::Error
        }
    }
}
