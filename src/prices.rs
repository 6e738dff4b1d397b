// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! USD price quotes from the Relay currency API.
//!
//! Lookups never fail: a transport error, a non-2xx status or a response
//! without a usable price all come back as `None`. Quotes are kept in a
//! short-lived LRU cache; failures are not cached.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use lru::LruCache;
use reqwest::Client;
use serde_json::Value;

/// Max number of tokens with a cached quote.
const PRICE_CACHE_CAPACITY: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price API returned status {0}")]
    Status(u16),

    #[error("no price in response")]
    NoQuote,
}

/// Source of USD quotes.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self, token: &str) -> Result<f64, PriceError>;
}

/// Pull the price out of a `/currencies/v1` response.
///
/// The API answers with an array of currencies; the first entry's
/// `currencyPriceUsd` is used, whether sent as a string or a number.
pub fn parse_price_response(body: &Value) -> Option<f64> {
    let price = body.as_array()?.first()?.get("currencyPriceUsd")?;
    let value = match price {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Relay API client.
pub struct HttpPriceSource {
    client: Client,
    base_url: String,
    chain_id: u64,
}

impl HttpPriceSource {
    pub fn new(base_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            chain_id,
        }
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_price(&self, token: &str) -> Result<f64, PriceError> {
        let url = format!("{}/currencies/v1", self.base_url.trim_end_matches('/'));
        let chain_id = self.chain_id.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("address", token), ("chainId", chain_id.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        parse_price_response(&body).ok_or(PriceError::NoQuote)
    }
}

/// Cached quote with its insertion time.
struct CacheEntry {
    price: f64,
    inserted_at: Instant,
}

/// In-process LRU cache of recent quotes. A zero TTL disables caching.
pub struct PriceCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Returns `None` if not cached or expired.
    pub fn get(&self, token: &str) -> Option<f64> {
        if self.ttl.is_zero() {
            return None;
        }
        let key = token.to_lowercase();
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.price);
            }
            cache.pop(&key);
        }
        None
    }

    pub fn put(&self, token: &str, price: f64) {
        if self.ttl.is_zero() {
            return;
        }
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                token.to_lowercase(),
                CacheEntry {
                    price,
                    inserted_at: Instant::now(),
                },
            );
        }
    }
}

/// Price lookups with caching and failure isolation.
#[derive(Clone)]
pub struct PriceOracle {
    source: Arc<dyn PriceSource>,
    cache: Arc<PriceCache>,
}

impl PriceOracle {
    pub fn new(source: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: Arc::new(PriceCache::new(PRICE_CACHE_CAPACITY, ttl)),
        }
    }

    /// Oracle backed by the Relay API.
    pub fn relay(base_url: &str, chain_id: u64, ttl: Duration) -> Self {
        Self::new(Arc::new(HttpPriceSource::new(base_url, chain_id)), ttl)
    }

    /// USD price of `token`, or `None` when no quote is available.
    pub async fn token_price(&self, token: &str) -> Option<f64> {
        if let Some(price) = self.cache.get(token) {
            return Some(price);
        }

        match self.source.fetch_price(token).await {
            Ok(price) => {
                self.cache.put(token, price);
                Some(price)
            }
            Err(PriceError::NoQuote) => {
                tracing::debug!(token, "No price quote");
                None
            }
            Err(e) => {
                tracing::warn!(token, error = %e, "Price lookup failed");
                None
            }
        }
    }

    /// Prices for several tokens, looked up concurrently.
    ///
    /// Keys are lowercase addresses; tokens without a quote are left out.
    pub async fn token_prices(&self, tokens: &[String]) -> HashMap<String, f64> {
        let lookups = tokens.iter().map(|token| async move {
            self.token_price(token)
                .await
                .map(|price| (token.to_lowercase(), price))
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}
