use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::core::config::GeocoderConfig;
use crate::core::constants::USER_AGENT;
use crate::geocoding::{Geocoder, Place};
use crate::{MapError, Result};

/// Shared client for the default configuration. Building it once avoids the
/// cost of TLS and connection pool setup for every lookup.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build reqwest async client")
});

/// Client for a Nominatim-compatible `/search` endpoint
#[derive(Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let endpoint = reqwest::Url::parse(&config.endpoint).map_err(|e| {
            MapError::Config(format!("invalid geocoder endpoint {:?}: {}", config.endpoint, e))
        })?;

        let http = if config.user_agent == USER_AGENT && config.timeout_secs.is_none() {
            HTTP_CLIENT.clone()
        } else {
            let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
            if let Some(secs) = config.timeout_secs {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            builder.build()?
        };

        Ok(Self { http, endpoint })
    }

    /// Client for the public OpenStreetMap instance
    pub fn openstreetmap() -> Result<Self> {
        Self::new(&GeocoderConfig::default())
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>> {
        let limit_param = limit.to_string();
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("format", "json"),
                ("limit", limit_param.as_str()),
                ("q", query),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let mut places: Vec<Place> = serde_json::from_str(&body)?;
        places.truncate(limit);

        log::info!("geocoded {:?}: {} candidate(s)", query, places.len());
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let client = NominatimClient::openstreetmap().unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://nominatim.openstreetmap.org/search"
        );
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let config = GeocoderConfig {
            endpoint: "not a url".to_string(),
            ..GeocoderConfig::default()
        };
        assert!(matches!(
            NominatimClient::new(&config),
            Err(MapError::Config(_))
        ));
    }
}
