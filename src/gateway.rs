use anyhow::Result;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{
    ContentItem, Credits, MediaKind, MovieDetails, Season, TimeWindow, Trailer, TrendingKind,
    TvDetails,
};
use crate::tmdb::{select_trailer, TmdbApi};

/// Fail-soft front for [`TmdbApi`]: failures are logged and come back as an
/// empty list or `None` so one bad sub-fetch never takes a page down.
#[derive(Clone)]
pub struct Gateway {
    api: Arc<dyn TmdbApi>,
}

impl Gateway {
    pub fn new(api: Arc<dyn TmdbApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<dyn TmdbApi> {
        &self.api
    }

    pub async fn trending(&self, kind: TrendingKind, window: TimeWindow) -> Vec<ContentItem> {
        soft(
            self.api.trending(kind, window).await,
            "trending",
            kind.as_path(),
        )
        .unwrap_or_default()
    }

    pub async fn by_genre(&self, genre_id: i64) -> Vec<ContentItem> {
        soft(
            self.api.discover_movies(genre_id).await,
            "discover",
            &genre_id.to_string(),
        )
        .unwrap_or_default()
    }

    /// Fail-soft multi-search for callers with no error state to show; an
    /// outage reads as no results. Blank queries never reach the network.
    pub async fn search(&self, query: &str) -> Vec<ContentItem> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        soft(self.api.search_multi(query).await, "search", query).unwrap_or_default()
    }

    pub async fn movie(&self, id: i64) -> Option<MovieDetails> {
        soft(self.api.movie_details(id).await, "movie", &id.to_string())
    }

    pub async fn show(&self, id: i64) -> Option<TvDetails> {
        soft(self.api.tv_details(id).await, "tv", &id.to_string())
    }

    /// Base show record with every stub season filled from its season-details
    /// call. The season calls run in parallel; a failed one leaves that season
    /// with no episodes.
    pub async fn show_with_episodes(&self, id: i64) -> Option<TvDetails> {
        let mut show = self.show(id).await?;
        let detailed = join_all(
            show.seasons
                .iter()
                .map(|s| self.season(id, s.season_number)),
        )
        .await;

        let mut by_number: HashMap<u32, Season> = detailed
            .into_iter()
            .flatten()
            .map(|s| (s.season_number, s))
            .collect();
        let stubs = std::mem::take(&mut show.seasons);
        show.seasons = stubs
            .into_iter()
            .map(|stub| {
                let detail = by_number.remove(&stub.season_number);
                merge_season(stub, detail)
            })
            .collect();
        debug!(
            show_id = id,
            seasons = show.seasons.len(),
            "Merged season episode lists"
        );
        Some(show)
    }

    pub async fn credits(&self, kind: MediaKind, id: i64) -> Option<Credits> {
        soft(self.api.credits(kind, id).await, "credits", &id.to_string())
    }

    pub async fn trailer(&self, kind: MediaKind, id: i64) -> Option<Trailer> {
        let videos = soft(self.api.videos(kind, id).await, "videos", &id.to_string())?;
        select_trailer(&videos)
    }

    pub async fn similar(&self, kind: MediaKind, id: i64) -> Vec<ContentItem> {
        soft(self.api.similar(kind, id).await, "similar", &id.to_string()).unwrap_or_default()
    }

    pub async fn season(&self, show_id: i64, season_number: u32) -> Option<Season> {
        soft(
            self.api.season_details(show_id, season_number).await,
            "season",
            &format!("{show_id}/{season_number}"),
        )
    }
}

/// Attaches a detailed season onto its stub. Detailed name and overview win
/// when present; otherwise the stub values stay.
pub fn merge_season(stub: Season, detailed: Option<Season>) -> Season {
    let Some(detailed) = detailed else {
        return Season {
            episodes: Vec::new(),
            ..stub
        };
    };
    let name = if detailed.name.trim().is_empty() {
        stub.name
    } else {
        detailed.name
    };
    let episode_count = if detailed.episodes.is_empty() {
        stub.episode_count
    } else {
        detailed.episodes.len() as u32
    };
    Season {
        id: stub.id,
        season_number: stub.season_number,
        name,
        overview: detailed.overview.or(stub.overview),
        poster_path: stub.poster_path.or(detailed.poster_path),
        air_date: stub.air_date.or(detailed.air_date),
        episode_count,
        episodes: detailed.episodes,
    }
}

fn soft<T>(result: Result<T>, what: &str, target: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(request = what, id = %target, "TMDB request failed: {:#}", e);
            None
        }
    }
}
