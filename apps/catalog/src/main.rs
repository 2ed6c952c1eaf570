use std::{fmt::Display, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use catalog_core::{
    load_settings, plan, render_text, CatalogCard, CatalogSettings, DiamondCounter,
    ListController, LoadOutcome, RawgClient, RemoteListSource, Screen, ScrollMetrics,
    ScrollTrigger, Session,
};
use clap::{Parser, Subcommand};
use shared::domain::CatalogKind;
use tracing::info;

/// Height of one rendered card in the simulated scroll container.
const CARD_HEIGHT: f64 = 120.0;
const VIEWPORT_HEIGHT: f64 = 720.0;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse the game catalog")]
struct Args {
    /// Config file; defaults to ./catalog.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Games {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    Stores {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    Creators {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show a single game by slug.
    Game { slug: String },
    /// Fetch the first page of every list at once.
    Overview,
    /// Press the "Get Diamonds" button a few times.
    Diamonds {
        #[arg(long, default_value_t = 1)]
        clicks: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let client = RawgClient::from_settings(&settings).context("failed to create catalog client")?;
    let session = Session::new(DiamondCounter::new());

    match args.command {
        Command::Games { pages } => {
            browse(client.games(), Screen::Games, pages, &settings, &session).await
        }
        Command::Stores { pages } => {
            browse(client.stores(), Screen::Stores, pages, &settings, &session).await
        }
        Command::Creators { pages } => {
            browse(client.creators(), Screen::Leaderboard, pages, &settings, &session).await
        }
        Command::Game { slug } => {
            let details = client
                .fetch_game_details(&slug)
                .await
                .with_context(|| format!("failed to fetch game '{slug}'"))?;
            for line in details.card_lines(&settings.presentation) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Overview => overview(&client).await,
        Command::Diamonds { clicks } => {
            for _ in 0..clicks {
                session.diamonds().increment();
            }
            print_topbar(Screen::Games, &session);
            Ok(())
        }
    }
}

/// Loads the first page, then keeps "scrolling to the bottom" until `pages`
/// pages are shown or the list runs out.
async fn browse<S>(
    source: S,
    screen: Screen,
    pages: usize,
    settings: &CatalogSettings,
    session: &Session,
) -> Result<()>
where
    S: RemoteListSource + 'static,
    S::Item: CatalogCard,
{
    let controller = ListController::new(screen.title(), source);
    let trigger = ScrollTrigger::attach(&controller).with_epsilon(settings.scroll_epsilon);

    print_topbar(screen, session);
    controller.load_initial().await;

    for _ in 1..pages.max(1) {
        let loaded = controller.snapshot().await.items.len();
        let metrics = ScrollMetrics::at_bottom(VIEWPORT_HEIGHT, loaded as f64 * CARD_HEIGHT);
        let Some(next) = trigger.on_scroll(metrics).await else {
            break;
        };
        match next.await.context("load task panicked")? {
            LoadOutcome::Loaded { added, exhausted } => {
                info!(added, exhausted, "catalog: scrolled to next page");
            }
            LoadOutcome::Failed(_) | LoadOutcome::Skipped | LoadOutcome::Abandoned => break,
        }
    }

    trigger.detach();
    let state = controller.snapshot().await;
    controller.dispose();

    print!(
        "{}",
        render_text(&plan(&state, screen, &settings.presentation), &settings.presentation)
    );
    if let Some(err) = state.error.as_ref().filter(|_| !state.items.is_empty()) {
        eprintln!("warning: stopped early: {err}");
    }
    if state.exhausted {
        println!("-- end of {} --", screen.title().to_lowercase());
    }
    Ok(())
}

async fn overview(client: &RawgClient) -> Result<()> {
    let games = ListController::new(CatalogKind::Games.label(), client.games());
    let stores = ListController::new(CatalogKind::Stores.label(), client.stores());
    let creators = ListController::new(CatalogKind::Creators.label(), client.creators());

    futures::future::join3(games.load_initial(), stores.load_initial(), creators.load_initial())
        .await;

    print_count(&games).await;
    print_count(&stores).await;
    print_count(&creators).await;
    Ok(())
}

async fn print_count<S>(controller: &Arc<ListController<S>>)
where
    S: RemoteListSource + 'static,
{
    let state = controller.snapshot().await;
    let status: &dyn Display = match &state.error {
        Some(err) => err,
        None if state.exhausted => &"complete",
        None => &"more available",
    };
    println!("{:<10} {:>4} loaded ({status})", controller.label(), state.items.len());
}

fn print_topbar(screen: Screen, session: &Session) {
    let user = session
        .profile()
        .map(|profile| profile.name.as_str())
        .unwrap_or("guest");
    println!(
        "{}    [diamonds: {}]    {user}",
        screen.title(),
        session.diamonds().value()
    );
}
