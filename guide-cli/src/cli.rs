use anyhow::Result;
use clap::{Parser, Subcommand};
use guide_core::{Config, SearchServices, Section, ServiceId, ViewState};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "guide", version, about = "City guide CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific service.
    Configure {
        /// Service short name, e.g. "openweather" or "googleplaces".
        service: String,
    },

    /// Search a city once and print weather, attractions and excerpt.
    Search {
        /// City name, free text.
        city: String,
    },

    /// Interactive session: search cities and browse their attractions.
    Explore,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { service } => configure(&service),
            Command::Search { city } => {
                let services = load_services()?;
                let mut view = ViewState::new();
                services.run(&mut view, &city).await;
                print!("{}", render::render_view(&view));
                Ok(())
            }
            Command::Explore => explore().await,
        }
    }
}

fn load_services() -> Result<SearchServices> {
    let config = Config::load()?;
    SearchServices::from_config(&config)
}

fn configure(service: &str) -> Result<()> {
    let id = ServiceId::try_from(service)?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let mut config = Config::load()?;
    config.upsert_service_api_key(id, api_key);
    config.save()?;

    println!(
        "Saved API key for '{id}' to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

enum BrowseOutcome {
    SearchAgain,
    Quit,
}

async fn explore() -> Result<()> {
    let services = load_services()?;
    let mut view = ViewState::new();
    print!("{}", render::render_view(&view));

    loop {
        let query = match Text::new("Search for a city:").prompt() {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        // Submitting an empty query does nothing, same as the search form.
        if query.trim().is_empty() {
            continue;
        }

        services.run(&mut view, &query).await;
        print!("{}", render::render_view(&view));

        if !matches!(view.visible_section(), Section::Results(_)) || view.places.is_empty() {
            continue;
        }

        match browse_places(&mut view)? {
            BrowseOutcome::SearchAgain => continue,
            BrowseOutcome::Quit => return Ok(()),
        }
    }
}

/// Offer the attractions list for selection until the user moves on.
/// Picking a place behaves like clicking a list item: the map re-centers
/// on it and the detail popover opens.
fn browse_places(view: &mut ViewState) -> Result<BrowseOutcome> {
    loop {
        let mut options: Vec<String> = view
            .places
            .iter()
            .map(|place| format!("{} — {}", place.name, place.rating_label()))
            .collect();
        let place_count = options.len();
        let has_close = view.selected.is_some();
        if has_close {
            options.push("Close popover".into());
        }
        options.push("Search again".into());
        options.push("Quit".into());

        let picked = match Select::new("Tourist attractions:", options).raw_prompt() {
            Ok(option) => option.index,
            Err(InquireError::OperationCanceled) => return Ok(BrowseOutcome::SearchAgain),
            Err(InquireError::OperationInterrupted) => return Ok(BrowseOutcome::Quit),
            Err(err) => return Err(err.into()),
        };

        if picked < place_count {
            let id = view.places[picked].id.clone();
            view.select_from_list(&id);
            print!("{}", render::render_view(view));
            continue;
        }

        let mut idx = picked - place_count;
        if has_close {
            if idx == 0 {
                view.clear_selection();
                print!("{}", render::render_view(view));
                continue;
            }
            idx -= 1;
        }

        if idx == 0 {
            return Ok(BrowseOutcome::SearchAgain);
        }
        return Ok(BrowseOutcome::Quit);
    }
}
