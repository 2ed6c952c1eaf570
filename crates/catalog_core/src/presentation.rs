//! What a list screen shows for a given [`ListState`], independent of how it
//! gets drawn.

use std::fmt::Write as _;

use shared::domain::{Creator, Game, GameDetails, GameRef, Store};

use crate::{config::PresentationSettings, controller::ListState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Games,
    Stores,
    Leaderboard,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Games => "Games",
            Screen::Stores => "Stores",
            Screen::Leaderboard => "Leader Board",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Screen::Games | Screen::Stores => "No games found. Please try again later.",
            Screen::Leaderboard => "No Leaders found. Please try again later.",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum RenderPlan<'a, T> {
    /// Nothing loaded yet and a fetch is running.
    Placeholder { cells: usize },
    Items {
        items: &'a [T],
        trailing_placeholder: Option<usize>,
    },
    /// Nothing loaded and the last fetch failed.
    Failed { message: String },
    Empty { message: &'static str },
}

pub fn plan<'a, T>(
    state: &'a ListState<T>,
    screen: Screen,
    settings: &PresentationSettings,
) -> RenderPlan<'a, T> {
    match (state.loading, state.items.is_empty()) {
        (true, true) => RenderPlan::Placeholder {
            cells: settings.initial_placeholder_cells,
        },
        (loading, false) => RenderPlan::Items {
            items: &state.items,
            trailing_placeholder: loading.then_some(settings.trailing_placeholder_cells),
        },
        (false, true) => match &state.error {
            Some(err) => RenderPlan::Failed {
                message: format!("Could not load {}: {err}", screen.title().to_lowercase()),
            },
            None => RenderPlan::Empty {
                message: screen.empty_message(),
            },
        },
    }
}

/// Plain-text card for one catalog entry.
pub trait CatalogCard {
    fn card_lines(&self, settings: &PresentationSettings) -> Vec<String>;
}

impl CatalogCard for Game {
    fn card_lines(&self, _settings: &PresentationSettings) -> Vec<String> {
        let released = self
            .released
            .map(|date| date.to_string())
            .unwrap_or_else(|| "TBA".to_string());
        vec![
            self.name.clone(),
            format!("Released: {released}"),
            format!("{} / {}", self.rating, self.rating_top),
        ]
    }
}

impl CatalogCard for Store {
    fn card_lines(&self, settings: &PresentationSettings) -> Vec<String> {
        let mut lines = vec![self.name.clone(), "Popular Items".to_string()];
        lines.extend(popular_games(&self.games, settings.popular_games_shown));
        lines
    }
}

impl CatalogCard for Creator {
    fn card_lines(&self, settings: &PresentationSettings) -> Vec<String> {
        let positions = self
            .positions
            .iter()
            .map(|position| position.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut lines = vec![self.name.clone()];
        if !positions.is_empty() {
            lines.push(positions);
        }
        lines.push("Known for".to_string());
        lines.extend(popular_games(&self.games, settings.popular_games_shown));
        lines
    }
}

impl CatalogCard for GameDetails {
    fn card_lines(&self, _settings: &PresentationSettings) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if let Some(released) = self.released {
            lines.push(format!("Released: {released}"));
        }
        lines.push(format!("Rating: {} / {}", self.rating, self.rating_top));
        if let Some(metacritic) = self.metacritic {
            lines.push(format!("Metacritic: {metacritic}"));
        }
        if !self.genres.is_empty() {
            let genres: Vec<&str> = self.genres.iter().map(|g| g.name.as_str()).collect();
            lines.push(format!("Genres: {}", genres.join(", ")));
        }
        if !self.platforms.is_empty() {
            let platforms: Vec<&str> = self
                .platforms
                .iter()
                .map(|entry| entry.platform.name.as_str())
                .collect();
            lines.push(format!("Platforms: {}", platforms.join(", ")));
        }
        if let Some(website) = self.website.as_deref().filter(|w| !w.is_empty()) {
            lines.push(website.to_string());
        }
        if let Some(description) = self.description_raw.as_deref().filter(|d| !d.is_empty()) {
            lines.push(String::new());
            lines.push(description.to_string());
        }
        lines
    }
}

fn popular_games(games: &[GameRef], shown: usize) -> impl Iterator<Item = String> + '_ {
    games
        .iter()
        .take(shown)
        .map(|game| format!("  {}  {}", game.name, game.added))
}

pub fn render_text<T: CatalogCard>(
    plan: &RenderPlan<'_, T>,
    settings: &PresentationSettings,
) -> String {
    let mut out = String::new();
    match plan {
        RenderPlan::Placeholder { cells } => push_placeholders(&mut out, *cells),
        RenderPlan::Items {
            items,
            trailing_placeholder,
        } => {
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push('\n');
                }
                for line in item.card_lines(settings) {
                    let _ = writeln!(out, "{line}");
                }
            }
            if let Some(cells) = trailing_placeholder {
                out.push('\n');
                push_placeholders(&mut out, *cells);
            }
        }
        RenderPlan::Failed { message } => {
            let _ = writeln!(out, "{message}");
        }
        RenderPlan::Empty { message } => {
            let _ = writeln!(out, "{message}");
        }
    }
    out
}

fn push_placeholders(out: &mut String, cells: usize) {
    for _ in 0..cells {
        out.push_str("[ ........ ]\n");
    }
}

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod tests;
