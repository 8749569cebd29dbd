//! Search orchestration: one primary lookup gates two independent
//! secondary enrichments. The primary failure is fatal to the cycle and
//! surfaces a single generic message; secondary failures are logged and
//! leave their own slice empty.

use tracing::{debug, error, warn};

use crate::{
    Config,
    provider::{
        self, EncyclopediaProvider, PlacesProvider, WeatherProvider,
    },
    view::ViewState,
};

/// The one user-facing message for a failed search. Network failures and
/// unknown cities read the same; the log carries the difference.
pub const SEARCH_FAILED_MESSAGE: &str = "City not found. Please try another search.";

/// The three service clients behind a search cycle.
pub struct SearchServices {
    weather: Box<dyn WeatherProvider>,
    places: Box<dyn PlacesProvider>,
    encyclopedia: Box<dyn EncyclopediaProvider>,
}

impl SearchServices {
    pub fn new(
        weather: Box<dyn WeatherProvider>,
        places: Box<dyn PlacesProvider>,
        encyclopedia: Box<dyn EncyclopediaProvider>,
    ) -> Self {
        Self {
            weather,
            places,
            encyclopedia,
        }
    }

    /// Wire up the real clients. Fails fast when a required API key is
    /// missing so the user gets the configure hint before any search.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            provider::weather_from_config(config)?,
            provider::places_from_config(config)?,
            provider::encyclopedia_from_config(config),
        ))
    }

    /// Run one search cycle against `view`. Empty input is a no-op.
    pub async fn run(&self, view: &mut ViewState, query: &str) {
        let Some(ticket) = view.begin_search(query) else {
            return;
        };

        let query = query.trim();
        debug!(query, "starting search cycle");

        let report = match self.weather.current_weather(query).await {
            Ok(report) => report,
            Err(err) => {
                error!(%err, "primary city lookup failed");
                view.fail_search(ticket, SEARCH_FAILED_MESSAGE);
                return;
            }
        };

        let center = report.coord;
        let city = report.city.clone();
        debug!(city = %city, "resolved city, fetching enrichments");
        view.apply_weather(ticket, report);

        // Independent of each other; neither failure touches the other's
        // slice or the weather already on screen.
        let (places, excerpt) = tokio::join!(
            self.places.nearby_attractions(center),
            self.encyclopedia.city_summary(&city),
        );

        match places {
            Ok(places) => view.apply_places(ticket, places),
            Err(err) => warn!(%err, "places lookup failed; attractions stay empty"),
        }

        match excerpt {
            Ok(excerpt) => view.apply_excerpt(ticket, excerpt),
            Err(err) => warn!(%err, "encyclopedia lookup failed; excerpt stays empty"),
        }
    }
}
