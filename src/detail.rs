use serde::Serialize;
use tracing::{debug, info};

use crate::gateway::Gateway;
use crate::models::{Credits, MediaKind, UNKNOWN_CREDIT};
use crate::routes::Route;
use crate::utils::{
    extract_year, format_episode_runtime, format_long_date, format_rating, format_runtime,
};
use crate::views::{cards, CardView, ImageBase, ImageSize, PersonView, SeasonView, TrailerView};

const CAST_LIMIT: usize = 12;

#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
    pub id: i64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub year: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<String>,
    pub rating: Option<String>,
    pub vote_count: u64,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub director: String,
    pub cinematographer: String,
    pub cast: Vec<PersonView>,
    pub trailer: Option<TrailerView>,
    pub similar: Vec<CardView>,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TvView {
    pub id: i64,
    pub name: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub year: Option<String>,
    pub first_air_date: Option<String>,
    pub episode_runtime: Option<String>,
    pub rating: Option<String>,
    pub vote_count: u64,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub number_of_seasons: u32,
    pub number_of_episodes: u32,
    pub director: String,
    pub cinematographer: String,
    pub cast: Vec<PersonView>,
    pub trailer: Option<TrailerView>,
    pub similar: Vec<CardView>,
    pub seasons: Vec<SeasonView>,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonPage {
    pub show_id: i64,
    pub show_name: Option<String>,
    pub show_href: String,
    pub season: SeasonView,
}

/// Builds detail pages from parallel sub-fetches. Only the primary record is
/// required; credits, trailer and similar items are best effort.
#[derive(Clone)]
pub struct DetailAssembler {
    gateway: Gateway,
    images: ImageBase,
}

impl DetailAssembler {
    pub fn new(gateway: Gateway, images: ImageBase) -> Self {
        Self { gateway, images }
    }

    pub async fn movie(&self, id: i64) -> Option<MovieView> {
        let kind = MediaKind::Movie;
        let (details, credits, trailer, similar) = tokio::join!(
            self.gateway.movie(id),
            self.gateway.credits(kind, id),
            self.gateway.trailer(kind, id),
            self.gateway.similar(kind, id),
        );
        let Some(movie) = details else {
            info!(movie_id = id, "Movie not found");
            return None;
        };
        let (director, cinematographer, cast) = credit_parts(credits.as_ref(), &self.images);
        debug!(
            movie_id = id,
            cast = cast.len(),
            has_trailer = trailer.is_some(),
            similar = similar.len(),
            "Assembled movie detail"
        );

        Some(MovieView {
            id: movie.id,
            href: Route::detail(kind, movie.id, &movie.title).path(),
            year: extract_year(movie.release_date.as_deref()),
            release_date: format_long_date(movie.release_date.as_deref()),
            runtime: format_runtime(movie.runtime),
            rating: format_rating(movie.vote_average),
            vote_count: movie.vote_count,
            genres: movie.genres.iter().map(|g| g.name.clone()).collect(),
            poster_url: self.images.url(movie.poster_path.as_deref(), ImageSize::Poster),
            backdrop_url: self
                .images
                .url(movie.backdrop_path.as_deref(), ImageSize::Original),
            title: movie.title,
            tagline: movie.tagline,
            overview: movie.overview,
            director,
            cinematographer,
            cast,
            trailer: trailer.as_ref().map(TrailerView::from),
            similar: cards(&similar, &self.images),
        })
    }

    pub async fn tv(&self, id: i64) -> Option<TvView> {
        let kind = MediaKind::Tv;
        let (details, credits, trailer, similar) = tokio::join!(
            self.gateway.show_with_episodes(id),
            self.gateway.credits(kind, id),
            self.gateway.trailer(kind, id),
            self.gateway.similar(kind, id),
        );
        let Some(show) = details else {
            info!(show_id = id, "TV show not found");
            return None;
        };
        let (director, cinematographer, cast) = credit_parts(credits.as_ref(), &self.images);
        let seasons = show
            .seasons
            .iter()
            .map(|s| SeasonView::from_season(show.id, s, &self.images))
            .collect::<Vec<_>>();
        debug!(
            show_id = id,
            seasons = seasons.len(),
            has_trailer = trailer.is_some(),
            "Assembled TV detail"
        );

        Some(TvView {
            id: show.id,
            href: Route::detail(kind, show.id, &show.name).path(),
            year: extract_year(show.first_air_date.as_deref()),
            first_air_date: format_long_date(show.first_air_date.as_deref()),
            episode_runtime: format_episode_runtime(&show.episode_run_time),
            rating: format_rating(show.vote_average),
            vote_count: show.vote_count,
            genres: show.genres.iter().map(|g| g.name.clone()).collect(),
            poster_url: self.images.url(show.poster_path.as_deref(), ImageSize::Poster),
            backdrop_url: self
                .images
                .url(show.backdrop_path.as_deref(), ImageSize::Original),
            number_of_seasons: show.number_of_seasons,
            number_of_episodes: show.number_of_episodes,
            name: show.name,
            tagline: show.tagline,
            overview: show.overview,
            director,
            cinematographer,
            cast,
            trailer: trailer.as_ref().map(TrailerView::from),
            similar: cards(&similar, &self.images),
            seasons,
        })
    }

    /// Season listing; the season record is primary, the show name is a
    /// nicety fetched alongside it.
    pub async fn season(&self, show_id: i64, season_number: u32) -> Option<SeasonPage> {
        let (show, season) = tokio::join!(
            self.gateway.show(show_id),
            self.gateway.season(show_id, season_number),
        );
        let season = season?;
        let show_href = match &show {
            Some(s) => Route::detail(MediaKind::Tv, s.id, &s.name).path(),
            None => format!("/tv/{show_id}"),
        };
        Some(SeasonPage {
            show_id,
            show_name: show.map(|s| s.name),
            show_href,
            season: SeasonView::from_season(show_id, &season, &self.images),
        })
    }
}

fn credit_parts(
    credits: Option<&Credits>,
    images: &ImageBase,
) -> (String, String, Vec<PersonView>) {
    match credits {
        Some(c) => (
            c.director.clone(),
            c.cinematographer.clone(),
            c.cast
                .iter()
                .take(CAST_LIMIT)
                .map(|p| PersonView::from_person(p, images))
                .collect(),
        ),
        None => (
            UNKNOWN_CREDIT.to_string(),
            UNKNOWN_CREDIT.to_string(),
            Vec::new(),
        ),
    }
}
