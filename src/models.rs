use serde::{Deserialize, Serialize};

/// Placeholder used when a credit role has no matching crew entry.
pub const UNKNOWN_CREDIT: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            _ => None,
        }
    }
}

/// Which trending feed the home page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingKind {
    #[default]
    All,
    Movie,
    Tv,
}

impl TrendingKind {
    pub fn as_path(&self) -> &'static str {
        match self {
            TrendingKind::All => "all",
            TrendingKind::Movie => "movie",
            TrendingKind::Tv => "tv",
        }
    }

    /// Unknown filters fall back to `All`.
    pub fn from_filter(input: Option<&str>) -> Self {
        match input.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("movie") => TrendingKind::Movie,
            Some("tv") => TrendingKind::Tv,
            _ => TrendingKind::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_path(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }

    pub fn from_param(input: Option<&str>) -> Self {
        match input.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("week") => TimeWindow::Week,
            _ => TimeWindow::Day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

const MOVIE_GENRES: &[(i64, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

pub fn movie_genres() -> Vec<Genre> {
    MOVIE_GENRES
        .iter()
        .map(|(id, name)| Genre {
            id: *id,
            name: name.to_string(),
        })
        .collect()
}

pub fn genre_name(id: i64) -> Option<&'static str> {
    MOVIE_GENRES
        .iter()
        .find(|(gid, _)| *gid == id)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub genre_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvShow {
    pub id: i64,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub first_air_date: Option<String>,
    pub genre_ids: Vec<i64>,
}

/// A trending/search/similar entry. The kind decides which title and date
/// field is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Movie(Movie),
    Tv(TvShow),
}

impl ContentItem {
    pub fn id(&self) -> i64 {
        match self {
            ContentItem::Movie(m) => m.id,
            ContentItem::Tv(t) => t.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            ContentItem::Movie(_) => MediaKind::Movie,
            ContentItem::Tv(_) => MediaKind::Tv,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Movie(m) => &m.title,
            ContentItem::Tv(t) => &t.name,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            ContentItem::Movie(m) => &m.overview,
            ContentItem::Tv(t) => &t.overview,
        }
    }

    pub fn date(&self) -> Option<&str> {
        match self {
            ContentItem::Movie(m) => m.release_date.as_deref(),
            ContentItem::Tv(t) => t.first_air_date.as_deref(),
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            ContentItem::Movie(m) => m.poster_path.as_deref(),
            ContentItem::Tv(t) => t.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            ContentItem::Movie(m) => m.backdrop_path.as_deref(),
            ContentItem::Tv(t) => t.backdrop_path.as_deref(),
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            ContentItem::Movie(m) => m.vote_average,
            ContentItem::Tv(t) => t.vote_average,
        }
    }

    pub fn genre_ids(&self) -> &[i64] {
        match self {
            ContentItem::Movie(m) => &m.genre_ids,
            ContentItem::Tv(t) => &t.genre_ids,
        }
    }
}

/// Cast or crew entry. `role` is the character for cast and the job for crew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credits {
    pub cast: Vec<Person>,
    pub crew: Vec<Person>,
    pub director: String,
    pub cinematographer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub site: String,
    pub key: String,
    pub video_type: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trailer {
    pub site: String,
    pub key: String,
    pub video_type: String,
}

impl Trailer {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}?autoplay=1", self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    pub id: i64,
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
    pub vote_average: Option<f64>,
    pub runtime: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Season {
    pub id: i64,
    pub season_number: u32,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub air_date: Option<String>,
    pub episode_count: u32,
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn is_specials(&self) -> bool {
        self.season_number == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvDetails {
    pub id: i64,
    pub name: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub episode_run_time: Vec<u32>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub number_of_seasons: u32,
    pub number_of_episodes: u32,
    pub genres: Vec<Genre>,
    pub seasons: Vec<Season>,
}
