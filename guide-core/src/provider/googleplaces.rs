use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinates, PlaceOfInterest};

use super::PlacesProvider;

/// Search radius around the resolved city center, in meters.
const SEARCH_RADIUS_M: u32 = 5000;
/// Place category requested from the nearby-search endpoint.
const PLACE_TYPE: &str = "tourist_attraction";

/// Google Places nearby-search client. Secondary lookup: its failures are
/// the caller's to swallow.
#[derive(Debug, Clone)]
pub struct GooglePlacesProvider {
    api_key: String,
    http: Client,
}

impl GooglePlacesProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn fetch_nearby(&self, center: Coordinates) -> Result<Vec<PlaceOfInterest>> {
        let url = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

        let location = format!("{},{}", center.lat, center.lon);
        let radius = SEARCH_RADIUS_M.to_string();

        let res = self
            .http
            .get(url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", PLACE_TYPE),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Google Places (nearby search)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Google Places response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Google Places nearby request failed with status {status}"
            ));
        }

        let parsed: GpResponse =
            serde_json::from_str(&body).context("Failed to parse Google Places JSON")?;

        check_response_status(&parsed)?;

        Ok(places_from_results(parsed.results))
    }
}

/// The HTTP layer reports 200 even for refused requests; the real outcome
/// lives in the body's `status` field.
fn check_response_status(response: &GpResponse) -> Result<()> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(anyhow!(
            "Google Places returned status {other}: {}",
            response.error_message.as_deref().unwrap_or("no detail")
        )),
    }
}

fn places_from_results(results: Vec<GpResult>) -> Vec<PlaceOfInterest> {
    results
        .into_iter()
        .map(|r| PlaceOfInterest {
            id: r.place_id,
            name: r.name,
            coord: Coordinates::new(r.geometry.location.lat, r.geometry.location.lng),
            rating: r.rating,
            vicinity: r.vicinity.unwrap_or_default(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct GpResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GpResult>,
}

#[derive(Debug, Deserialize)]
struct GpResult {
    place_id: String,
    name: String,
    geometry: GpGeometry,
    rating: Option<f64>,
    vicinity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GpGeometry {
    location: GpLatLng,
}

#[derive(Debug, Deserialize)]
struct GpLatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn nearby_attractions(
        &self,
        center: Coordinates,
    ) -> Result<Vec<PlaceOfInterest>> {
        self.fetch_nearby(center).await
    }
}
