//! CLI Command Handlers
//!
//! Implements all CLI commands by driving the screen controllers the same way
//! a front end would. Each handler takes CLI args, config and Output, returns
//! ExitCode.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use crate::api::{ApiError, SearchFetcher, TvMazeClient, NOT_FOUND_PREFIX};
use crate::app::details::EPISODE_ERROR;
use crate::app::{
    ChannelCoordinator, DetailsController, DetailsEvent, FavoritesController, ListEvent,
    PaginationController, Route, SearchController, SearchEvent,
};
use crate::cli::{
    EpisodeCmd, ExitCode, FavoritesAction, FavoritesCmd, ListCmd, Output, SearchCmd, ShowCmd,
};
use crate::config::Config;
use crate::episodes::EpisodeList;
use crate::models::{Episode, EpisodeDetailDisplay, ShowDetailDisplay, ShowDisplay};
use crate::store::{FavoritesStore, FileStore};

fn client(config: &Config) -> Arc<TvMazeClient> {
    Arc::new(TvMazeClient::with_base_url(config.api_base_url()))
}

fn open_favorites(config: &Config) -> anyhow::Result<Arc<FavoritesStore>> {
    let dir = config
        .data_dir()
        .context("Could not determine data directory (set TVSHELF_DATA_DIR)")?;
    Ok(Arc::new(FavoritesStore::new(FileStore::new(dir))))
}

// =============================================================================
// List Command
// =============================================================================

pub async fn list_cmd(cmd: ListCmd, config: &Config, output: &Output) -> ExitCode {
    let pages = cmd.pages.unwrap_or_else(|| config.default_pages()).max(1);
    let (controller, mut events) = PaginationController::new(client(config));

    output.info(format!("Loading {} page(s)...", pages));
    controller.start();

    let mut loaded_pages = 0;
    let mut error: Option<String> = None;

    while let Some(event) = events.recv().await {
        match event {
            ListEvent::Loading(true) => {}
            ListEvent::ItemsChanged { total, appended } => {
                loaded_pages += 1;
                output.info(format!("Page {}: {} shows ({} total)", controller.next_page(), appended, total));
            }
            ListEvent::Error(msg) => error = Some(msg),
            ListEvent::Loading(false) => {
                if error.is_some() || loaded_pages >= pages {
                    break;
                }
                // Pretend the user scrolled to the bottom of the list
                let last = controller.len().saturating_sub(1);
                if !controller.prefetch([last]) {
                    break;
                }
            }
        }
    }

    let mut shows = controller.display_items();
    if let Some(msg) = error {
        if shows.is_empty() {
            return output.error(format!("Show list failed: {}", msg), ExitCode::NetworkError);
        }
        output.info(format!("Stopped early: {}", msg));
    }
    if let Some(limit) = cmd.limit {
        shows.truncate(limit);
    }

    let lines: Vec<String> = shows
        .iter()
        .map(|s| format!("{:>7}  {}", s.id, s.title))
        .collect();
    if let Err(e) = output.print_lines(&shows, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Show / Episode Commands
// =============================================================================

#[derive(Debug, Serialize)]
struct SeasonOutput<'a> {
    season: Option<i32>,
    episodes: &'a [Episode],
}

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    detail: &'a ShowDetailDisplay,
    favorite: bool,
    seasons: Vec<SeasonOutput<'a>>,
}

/// Result of driving a detail controller until its first load finishes
struct LoadedDetail {
    controller: DetailsController,
    detail: ShowDetailDisplay,
    seasons: EpisodeList,
    favorite: bool,
}

async fn load_detail(
    id: u64,
    config: &Config,
    coordinator: Option<ChannelCoordinator>,
) -> Result<LoadedDetail, String> {
    let favorites = open_favorites(config).map_err(|e| e.to_string())?;
    let (controller, mut events) = DetailsController::new(id, client(config), favorites);
    let controller = match coordinator {
        Some(coordinator) => controller.with_coordinator(coordinator),
        None => controller,
    };
    controller.start();

    let mut data = None;
    let mut favorite = false;
    let mut error = None;

    while let Some(event) = events.recv().await {
        match event {
            DetailsEvent::Loading(true) => {}
            DetailsEvent::Data { detail, seasons } => data = Some((detail, seasons)),
            DetailsEvent::Favorite(flag) => favorite = flag,
            DetailsEvent::Error(msg) => error = Some(msg),
            DetailsEvent::Loading(false) => break,
        }
    }

    match (data, error) {
        (Some((detail, seasons)), None) => Ok(LoadedDetail {
            controller,
            detail,
            seasons,
            favorite,
        }),
        (_, Some(msg)) => Err(msg),
        (None, None) => Err(format!("No data received for show {}", id)),
    }
}

pub async fn show_cmd(cmd: ShowCmd, config: &Config, output: &Output) -> ExitCode {
    output.info(format!("Getting show {}...", cmd.id));

    let loaded = match load_detail(cmd.id, config, None).await {
        Ok(loaded) => loaded,
        Err(msg) => return lookup_failed(output, "Show lookup failed", &msg),
    };

    let seasons: Vec<SeasonOutput> = loaded
        .seasons
        .seasons
        .iter()
        .map(|bucket| SeasonOutput {
            season: bucket.season(),
            episodes: &bucket.episodes,
        })
        .collect();

    let detail = &loaded.detail;
    let mut lines = vec![
        format!("{} [#{}]{}", detail.name, detail.id, if loaded.favorite { " ★" } else { "" }),
        format!("Genres:   {}", detail.genres),
        format!("Schedule: {}", detail.schedule),
        String::new(),
        detail.summary.clone(),
    ];
    for (position, season) in seasons.iter().enumerate() {
        lines.push(String::new());
        let label = season
            .season
            .map(|n| format!("Season {}", n))
            .unwrap_or_else(|| "Season ?".to_string());
        lines.push(format!("{}. {}", position + 1, label));
        for (index, episode) in season.episodes.iter().enumerate() {
            lines.push(format!("   {:>2}. {}", index + 1, episode));
        }
    }

    let data = ShowOutput {
        detail,
        favorite: loaded.favorite,
        seasons,
    };
    if let Err(e) = output.print_lines(&data, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

pub async fn episode_cmd(cmd: EpisodeCmd, config: &Config, output: &Output) -> ExitCode {
    let Some((season_index, episode_index)) = cmd.positions() else {
        return output.error("Season and episode positions start at 1", ExitCode::InvalidArgs);
    };

    let (coordinator, mut routes) = ChannelCoordinator::new();
    let loaded = match load_detail(cmd.id, config, Some(coordinator)).await {
        Ok(loaded) => loaded,
        Err(msg) => return lookup_failed(output, "Show lookup failed", &msg),
    };

    if loaded.controller.did_select_episode(season_index, episode_index).is_err() {
        return output.error(EPISODE_ERROR, ExitCode::NotFound);
    }

    let episode = match routes.try_recv() {
        Ok(Route::EpisodeDetails(episode)) => episode,
        _ => return output.error(EPISODE_ERROR, ExitCode::Error),
    };

    let display = EpisodeDetailDisplay::from(&episode);
    let mut lines = vec![
        display.name.clone(),
        display.season.clone(),
        display.number.clone(),
        display.summary.clone(),
    ];
    if let Some(url) = &display.image_url {
        lines.push(format!("Image: {}", url));
    }
    if let Err(e) = output.print_lines(&display, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let client = client(config);
    output.info(format!("Searching for: {}", cmd.query));

    if cmd.all {
        return match client.fetch_all(&cmd.query).await {
            Ok(mut results) => {
                results.truncate(cmd.limit);
                let lines: Vec<String> = results
                    .iter()
                    .map(|r| format!("{:>5.2}  {:>7}  {}", r.score, r.show.id, r.show.name))
                    .collect();
                if let Err(e) = output.print_lines(&results, &lines) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Err(e) => search_error(output, &e),
        };
    }

    let (controller, mut events) = SearchController::new(client);
    if !controller.set_query(&cmd.query) {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }
    controller.submit(&cmd.query);

    while let Some(event) = events.recv().await {
        match event {
            SearchEvent::Found { show, .. } => {
                let lines = vec![format!("{:>7}  {}", show.id, show.title)];
                if let Err(e) = output.print_lines(&show, &lines) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                return ExitCode::Success;
            }
            SearchEvent::Error { message, .. } => {
                return lookup_failed(output, "Search failed", &message);
            }
            SearchEvent::ButtonEnabled(_) | SearchEvent::Loading(_) => {}
        }
    }
    output.error("Search ended without a result", ExitCode::Error)
}

/// Controller events only carry the message; not-found errors keep their own exit code
fn lookup_failed(output: &Output, context: &str, msg: &str) -> ExitCode {
    let code = if msg.starts_with(NOT_FOUND_PREFIX) {
        ExitCode::NotFound
    } else {
        ExitCode::NetworkError
    };
    output.error(format!("{}: {}", context, msg), code)
}

fn search_error(output: &Output, e: &ApiError) -> ExitCode {
    let code = match e {
        ApiError::NotFound(_) => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    };
    output.error(format!("Search failed: {}", e), code)
}

// =============================================================================
// Favorites Command
// =============================================================================

pub async fn favorites_cmd(cmd: FavoritesCmd, config: &Config, output: &Output) -> ExitCode {
    let store = match open_favorites(config) {
        Ok(store) => store,
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    match cmd.action {
        FavoritesAction::List { sort } => {
            let (mut controller, _events) = FavoritesController::new(store);
            if let Err(e) = controller.refresh() {
                return output.error(format!("Could not read favorites: {}", e), ExitCode::Error);
            }
            if let Some(criteria) = sort.criteria() {
                controller.sort(criteria);
            }

            if !controller.first_time_screen_shown() {
                output.info("Tip: add shows with `tvshelf favorites add <id>`");
                if let Err(e) = controller.save_alert_shown() {
                    tracing::warn!(error = %e, "could not persist hint flag");
                }
            }

            let items: Vec<ShowDisplay> = controller.items();
            let lines: Vec<String> = items
                .iter()
                .map(|s| format!("{:>7}  {}", s.id, s.title))
                .collect();
            if let Err(e) = output.print_lines(&items, &lines) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }

        FavoritesAction::Add { id } => {
            let client = client(config);
            let show = match client.show_detail(id).await {
                Ok(detail) => detail.as_show(),
                Err(e @ ApiError::NotFound(_)) => {
                    return output.error(format!("Show lookup failed: {}", e), ExitCode::NotFound)
                }
                Err(e) => {
                    return output.error(format!("Show lookup failed: {}", e), ExitCode::NetworkError)
                }
            };
            match store.add(&show) {
                Ok(added) => {
                    if !added {
                        output.info(format!("{} is already a favorite", show.name));
                    }
                    let display = ShowDisplay::from(&show);
                    let lines = vec![format!("★ {}", show)];
                    if let Err(e) = output.print_lines(&display, &lines) {
                        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                    }
                    ExitCode::Success
                }
                Err(e) => output.error(format!("Could not save favorite: {}", e), ExitCode::Error),
            }
        }

        FavoritesAction::Remove { id } => match store.remove(id) {
            Ok(true) => {
                let lines = vec![format!("Removed show {} from favorites", id)];
                if let Err(e) = output.print_lines(serde_json::json!({ "removed": id }), &lines) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Ok(false) => output.error(format!("Show {} is not a favorite", id), ExitCode::NotFound),
            Err(e) => output.error(format!("Could not update favorites: {}", e), ExitCode::Error),
        },
    }
}
