// ABOUTME: Test utilities for myipd-server, including a stub address lookup.
// ABOUTME: Lets dispatcher and resolver tests run without reaching the network.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use myipd_core::AddressFamily;
use reqwest::StatusCode;

use crate::resolver::{AddressLookup, LookupError};

/// An AddressLookup that answers from fixed values and counts its calls.
/// A family configured as None fails with a 503 status error.
#[derive(Debug, Default)]
pub struct StubLookup {
    ipv4: Option<String>,
    ipv6: Option<String>,
    calls: AtomicUsize,
}

impl StubLookup {
    /// Answer every lookup with the given addresses.
    pub fn new(ipv4: &str, ipv6: &str) -> Self {
        Self {
            ipv4: Some(ipv4.to_owned()),
            ipv6: Some(ipv6.to_owned()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every lookup.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Answer IPv4 lookups and fail IPv6 lookups.
    pub fn ipv4_only(ipv4: &str) -> Self {
        Self {
            ipv4: Some(ipv4.to_owned()),
            ..Self::default()
        }
    }

    /// Number of lookups made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressLookup for StubLookup {
    async fn lookup(&self, family: AddressFamily) -> Result<String, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = match family {
            AddressFamily::V4 => &self.ipv4,
            AddressFamily::V6 => &self.ipv6,
        };
        answer.clone().ok_or_else(|| LookupError::Status {
            url: format!("stub://{}", family),
            status: StatusCode::SERVICE_UNAVAILABLE,
        })
    }
}
