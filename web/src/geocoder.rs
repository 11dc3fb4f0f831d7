use geezer_core::{AddressCandidate, BoundingBox};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocoderConfig;
use crate::workflow::MAX_CANDIDATES;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// One entry of a Nominatim `format=jsonv2` search response.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

/// Address lookup against a Nominatim compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    country_codes: String,
    viewbox: Option<BoundingBox>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            country_codes: config.country_codes.clone(),
            viewbox: None,
        })
    }

    /// Restricts upstream results to `bbox`.
    pub fn bounded_to(mut self, bbox: BoundingBox) -> Self {
        self.viewbox = Some(bbox);
        self
    }

    pub async fn lookup(&self, query: &str) -> Result<Vec<AddressCandidate>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = MAX_CANDIDATES.to_string();
        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", limit),
        ];
        if !self.country_codes.is_empty() {
            params.push(("countrycodes", self.country_codes.clone()));
        }
        if let Some(b) = &self.viewbox {
            params.push((
                "viewbox",
                format!("{},{},{},{}", b.min_lon, b.max_lat, b.max_lon, b.min_lat),
            ));
            params.push(("bounded", "1".to_string()));
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Status { status, body });
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let candidates: Vec<AddressCandidate> = places
            .into_iter()
            .filter_map(|place| {
                let latitude = place.lat.parse::<f64>().ok()?;
                let longitude = place.lon.parse::<f64>().ok()?;
                Some(AddressCandidate {
                    full_address: place.display_name,
                    latitude,
                    longitude,
                })
            })
            .take(MAX_CANDIDATES)
            .collect();

        tracing::debug!(query, found = candidates.len(), "geocoder lookup");
        Ok(candidates)
    }
}
