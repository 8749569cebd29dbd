use crate::{
    Config,
    model::{Coordinates, PlaceOfInterest, WeatherReport},
    provider::{
        googleplaces::GooglePlacesProvider, openweather::OpenWeatherProvider,
        wikipedia::WikipediaProvider,
    },
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};
use thiserror::Error;

pub mod googleplaces;
pub mod openweather;
pub mod wikipedia;

/// External services that require a configured API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    OpenWeather,
    GooglePlaces,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "openweather",
            ServiceId::GooglePlaces => "googleplaces",
        }
    }

    /// Environment variable that overrides the config-file key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "OPENWEATHER_API_KEY",
            ServiceId::GooglePlaces => "GOOGLE_MAPS_API_KEY",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::OpenWeather, ServiceId::GooglePlaces]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ServiceId::OpenWeather),
            "googleplaces" => Ok(ServiceId::GooglePlaces),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Configurable services: openweather, googleplaces."
            )),
        }
    }
}

/// Failure of the primary city lookup. The split exists for diagnostics;
/// user-facing handling treats every variant the same way.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("city not found: '{city}'")]
    CityNotFound { city: String },

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Primary lookup: resolve a free-text city name to canonical name,
/// coordinates and current conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

/// Secondary lookup: points of interest near a coordinate.
#[async_trait]
pub trait PlacesProvider: Send + Sync + Debug {
    async fn nearby_attractions(
        &self,
        center: Coordinates,
    ) -> anyhow::Result<Vec<PlaceOfInterest>>;
}

/// Secondary lookup: introductory encyclopedia extract for a title.
/// `Ok(None)` means the title has no usable extract (missing page or a
/// disambiguation page).
#[async_trait]
pub trait EncyclopediaProvider: Send + Sync + Debug {
    async fn city_summary(&self, title: &str) -> anyhow::Result<Option<String>>;
}

fn require_api_key(config: &Config, id: ServiceId) -> anyhow::Result<String> {
    config.service_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for service '{id}'.\n\
                 Hint: run `guide configure {id}` and enter your API key, \
                 or set {}.",
            id.env_var()
        )
    })
}

/// Construct the weather provider from config.
pub fn weather_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = require_api_key(config, ServiceId::OpenWeather)?;
    Ok(Box::new(OpenWeatherProvider::new(
        api_key,
        config.language().to_owned(),
    )))
}

/// Construct the places provider from config.
pub fn places_from_config(config: &Config) -> anyhow::Result<Box<dyn PlacesProvider>> {
    let api_key = require_api_key(config, ServiceId::GooglePlaces)?;
    Ok(Box::new(GooglePlacesProvider::new(api_key)))
}

/// Construct the encyclopedia provider from config. Needs no credentials,
/// only the edition matching the configured language.
pub fn encyclopedia_from_config(config: &Config) -> Box<dyn EncyclopediaProvider> {
    Box::new(WikipediaProvider::new(config.wiki_language().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn service_id_as_str_roundtrip() {
        for id in ServiceId::all() {
            let s = id.as_str();
            let parsed = ServiceId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_service_error() {
        let err = ServiceId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown service"));
    }

    #[test]
    fn weather_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = weather_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for service"));
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));
    }

    #[test]
    fn weather_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "KEY".to_string());

        assert!(weather_from_config(&cfg).is_ok());
    }

    #[test]
    fn encyclopedia_needs_no_key() {
        let cfg = Config::default();
        let provider = encyclopedia_from_config(&cfg);
        assert!(format!("{provider:?}").contains("pt"));
    }
}
