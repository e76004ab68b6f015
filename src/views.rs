//! Render-ready projections of the view models. Image paths are resolved
//! here so every page gets a usable URL or a placeholder asset.

use serde::Serialize;

use crate::models::{genre_name, ContentItem, Episode, MediaKind, Person, Season, Trailer};
use crate::routes::Route;
use crate::utils::{extract_year, format_long_date, format_rating, format_runtime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Thumb,
    Profile,
    Still,
    Poster,
    Gallery,
    Backdrop,
    Original,
}

impl ImageSize {
    fn token(&self) -> &'static str {
        match self {
            ImageSize::Thumb => "w92",
            ImageSize::Profile => "w185",
            ImageSize::Still => "w300",
            ImageSize::Poster => "w500",
            ImageSize::Gallery => "w780",
            ImageSize::Backdrop => "w1280",
            ImageSize::Original => "original",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            ImageSize::Thumb => "/placeholder.svg?height=138&width=92",
            ImageSize::Profile => "/placeholder.svg?height=185&width=185",
            ImageSize::Still => "/placeholder.svg?height=169&width=300",
            ImageSize::Poster => "/placeholder.svg?height=450&width=300",
            ImageSize::Gallery | ImageSize::Backdrop | ImageSize::Original => {
                "/placeholder.svg?height=1080&width=1920"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageBase {
    base_url: String,
}

impl ImageBase {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: Option<&str>, size: ImageSize) -> String {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) if p.starts_with('/') => format!("{}/{}{}", self.base_url, size.token(), p),
            Some(p) => format!("{}/{}/{}", self.base_url, size.token(), p),
            None => size.placeholder().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: i64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub year: Option<String>,
    pub rating: Option<String>,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub href: String,
}

impl CardView {
    pub fn from_item(item: &ContentItem, images: &ImageBase) -> Self {
        Self {
            id: item.id(),
            kind: item.kind(),
            title: item.title().to_string(),
            overview: item.overview().to_string(),
            year: extract_year(item.date()),
            rating: format_rating(item.vote_average()),
            genres: item
                .genre_ids()
                .iter()
                .filter_map(|id| genre_name(*id))
                .map(str::to_string)
                .collect(),
            poster_url: images.url(item.poster_path(), ImageSize::Poster),
            backdrop_url: images.url(item.backdrop_path(), ImageSize::Backdrop),
            href: Route::for_item(item).path(),
        }
    }
}

pub fn cards(items: &[ContentItem], images: &ImageBase) -> Vec<CardView> {
    items.iter().map(|i| CardView::from_item(i, images)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonView {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub profile_url: String,
}

impl PersonView {
    pub fn from_person(person: &Person, images: &ImageBase) -> Self {
        Self {
            id: person.id,
            name: person.name.clone(),
            role: person.role.clone(),
            profile_url: images.url(person.profile_path.as_deref(), ImageSize::Profile),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailerView {
    pub site: String,
    pub key: String,
    pub watch_url: String,
    pub embed_url: String,
}

impl From<&Trailer> for TrailerView {
    fn from(trailer: &Trailer) -> Self {
        Self {
            site: trailer.site.clone(),
            key: trailer.key.clone(),
            watch_url: trailer.watch_url(),
            embed_url: trailer.embed_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeView {
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub rating: Option<String>,
    pub runtime: Option<String>,
    pub still_url: String,
}

impl EpisodeView {
    pub fn from_episode(episode: &Episode, images: &ImageBase) -> Self {
        Self {
            episode_number: episode.episode_number,
            name: episode.name.clone(),
            overview: episode.overview.clone(),
            air_date: format_long_date(episode.air_date.as_deref()),
            rating: episode.vote_average.and_then(format_rating),
            runtime: format_runtime(episode.runtime),
            still_url: images.url(episode.still_path.as_deref(), ImageSize::Still),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonView {
    pub season_number: u32,
    pub name: String,
    pub overview: String,
    pub year: Option<String>,
    pub episode_count: u32,
    pub poster_url: String,
    pub href: String,
    pub episodes: Vec<EpisodeView>,
}

impl SeasonView {
    pub fn from_season(show_id: i64, season: &Season, images: &ImageBase) -> Self {
        Self {
            season_number: season.season_number,
            name: season.name.clone(),
            overview: season
                .overview
                .clone()
                .unwrap_or_else(|| "No overview available.".to_string()),
            year: extract_year(season.air_date.as_deref()),
            episode_count: season.episode_count,
            poster_url: images.url(season.poster_path.as_deref(), ImageSize::Still),
            href: Route::Season {
                show_id,
                season_number: season.season_number,
            }
            .path(),
            episodes: season
                .episodes
                .iter()
                .map(|e| EpisodeView::from_episode(e, images))
                .collect(),
        }
    }
}
