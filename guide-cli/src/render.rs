//! Text rendering of the view state. Pure functions of `ViewState` so the
//! composition rules stay testable without a terminal.

use guide_core::{Section, ViewState};

/// Render the whole view: exactly one status section, then the results
/// layout (list, map viewport, popover) when weather data exists.
pub fn render_view(view: &ViewState) -> String {
    let mut out = String::new();

    match view.visible_section() {
        Section::Prompt => {
            out.push_str("Ready for an adventure!\n");
            out.push_str("Search for a city to start planning your trip.\n");
        }
        Section::Loading => {
            out.push_str("Fetching city data...\n");
        }
        Section::Error(message) => {
            out.push_str(message);
            out.push('\n');
        }
        Section::Results(report) => {
            out.push_str(&format!("== {} ==\n", report.city));
            if let Some(excerpt) = view.excerpt.as_deref() {
                out.push_str(excerpt);
                out.push('\n');
            }
            out.push_str(&format!("Temperature: {:.1}°C\n", report.temperature_c));
            out.push_str(&format!("Condition: {}\n", report.condition));

            if !view.places.is_empty() {
                out.push_str("\nTourist attractions:\n");
                for (i, place) in view.places.iter().enumerate() {
                    out.push_str(&format!(
                        "  {}. {} — {}\n",
                        i + 1,
                        place.name,
                        place.rating_label()
                    ));
                }
            }

            out.push_str(&format!(
                "\nMap: center {} (zoom {})\n",
                view.map.center, view.map.zoom
            ));

            if let Some(place) = view.selected_place() {
                out.push_str(&format!("\n[{}]\n{}\n", place.name, place.vicinity));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use guide_core::{Coordinates, PlaceOfInterest, ViewState, WeatherReport};

    fn lisboa_view() -> ViewState {
        let mut view = ViewState::new();
        let ticket = view.begin_search("Lisboa").expect("ticket");
        view.apply_weather(
            ticket,
            WeatherReport {
                city: "Lisboa".into(),
                temperature_c: 18.4,
                condition: "céu limpo".into(),
                coord: Coordinates::new(38.72, -9.13),
                observation_time: Utc::now(),
            },
        );
        view.apply_places(
            ticket,
            vec![
                PlaceOfInterest {
                    id: "p1".into(),
                    name: "Castelo de São Jorge".into(),
                    coord: Coordinates::new(38.71, -9.13),
                    rating: Some(4.6),
                    vicinity: "Rua de Santa Cruz do Castelo".into(),
                },
                PlaceOfInterest {
                    id: "p2".into(),
                    name: "Miradouro da Graça".into(),
                    coord: Coordinates::new(38.72, -9.13),
                    rating: None,
                    vicinity: "Largo da Graça".into(),
                },
            ],
        );
        view.apply_excerpt(ticket, Some("Lisboa é a capital de Portugal.".into()));
        view
    }

    #[test]
    fn prompt_view_before_first_search() {
        let rendered = render_view(&ViewState::new());
        assert!(rendered.contains("Search for a city"));
        assert!(!rendered.contains("Map:"));
    }

    #[test]
    fn loading_view_shows_only_the_notice() {
        let mut view = ViewState::new();
        view.begin_search("Lisboa").expect("ticket");

        let rendered = render_view(&view);
        assert!(rendered.contains("Fetching city data"));
        assert!(!rendered.contains("=="));
    }

    #[test]
    fn results_view_shows_weather_excerpt_and_viewport() {
        let rendered = render_view(&lisboa_view());

        assert!(rendered.contains("== Lisboa =="));
        assert!(rendered.contains("18.4°C"));
        assert!(rendered.contains("céu limpo"));
        assert!(rendered.contains("Lisboa é a capital de Portugal."));
        assert!(rendered.contains("Map: center 38.72, -9.13 (zoom 13)"));
    }

    #[test]
    fn rating_placeholder_appears_in_the_list() {
        let rendered = render_view(&lisboa_view());
        assert!(rendered.contains("Castelo de São Jorge — 4.6 ★"));
        assert!(rendered.contains("Miradouro da Graça — No rating"));
    }

    #[test]
    fn popover_appears_only_when_a_place_is_selected() {
        let mut view = lisboa_view();
        assert!(!render_view(&view).contains("Rua de Santa Cruz do Castelo"));

        view.select_marker("p1");
        let rendered = render_view(&view);
        assert!(rendered.contains("[Castelo de São Jorge]"));
        assert!(rendered.contains("Rua de Santa Cruz do Castelo"));

        view.clear_selection();
        assert!(!render_view(&view).contains("Rua de Santa Cruz do Castelo"));
    }

    #[test]
    fn error_view_renders_no_results_layout() {
        let mut view = ViewState::new();
        let ticket = view.begin_search("Xyzzyqq").expect("ticket");
        view.fail_search(ticket, guide_core::SEARCH_FAILED_MESSAGE);

        let rendered = render_view(&view);
        assert!(rendered.contains("City not found"));
        assert!(!rendered.contains("Map:"));
        assert!(!rendered.contains("Tourist attractions"));
    }
}
