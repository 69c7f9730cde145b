//! Places Module
//!
//! Thin client for the external points-of-interest service that augments
//! `WHATSAT` replies. The service is opaque and optional: an unconfigured
//! client, a timeout, a non-2xx status, or an unparseable body all collapse
//! to an empty JSON object so the reply itself never fails.

use anyhow::{Result, bail};
use serde_json::{Value, json};
use std::time::Duration;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct PlacesClient {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl PlacesClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn unconfigured() -> Self {
        Self::new(None)
    }

    /// Looks up places around a coordinate, bounded by `radius_km` and
    /// `max_results`. Always yields a JSON object.
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        max_results: usize,
    ) -> Value {
        let Some(base) = &self.base_url else {
            return json!({});
        };

        match self.fetch(base, latitude, longitude, radius_km, max_results).await {
            Ok(payload) => truncate_results(payload, max_results),
            Err(e) => {
                tracing::warn!("Places lookup failed: {e}");
                json!({})
            }
        }
    }

    async fn fetch(
        &self,
        base: &str,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        max_results: usize,
    ) -> Result<Value> {
        let url = format!("{}/nearby", base.trim_end_matches('/'));
        let response = self
            .http
            .get(url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("radius", radius_km.to_string()),
                ("limit", max_results.to_string()),
            ])
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("places service returned {}", response.status());
        }
        Ok(response.json().await?)
    }
}

/// The service is not trusted to honor `limit`; a `results` array, when
/// present, is cut down locally.
fn truncate_results(mut payload: Value, max_results: usize) -> Value {
    if let Some(results) = payload.get_mut("results").and_then(Value::as_array_mut) {
        results.truncate(max_results);
    }
    payload
}

#[cfg(test)]
mod tests;
