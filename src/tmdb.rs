use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::{Config, Credential};
use crate::models::{
    ContentItem, Credits, Episode, Genre, MediaKind, Movie, MovieDetails, Person, Season,
    TimeWindow, Trailer, TrendingKind, TvDetails, TvShow, Video, UNKNOWN_CREDIT,
};

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    language: String,
    credential: Credential,
}

/// Raw TMDB access. Every call reports failures; the fail-soft policy lives
/// in [`crate::gateway::Gateway`].
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn trending(&self, kind: TrendingKind, window: TimeWindow) -> Result<Vec<ContentItem>>;
    async fn discover_movies(&self, genre_id: i64) -> Result<Vec<ContentItem>>;
    async fn search_multi(&self, query: &str) -> Result<Vec<ContentItem>>;
    async fn movie_details(&self, id: i64) -> Result<MovieDetails>;
    async fn tv_details(&self, id: i64) -> Result<TvDetails>;
    async fn credits(&self, kind: MediaKind, id: i64) -> Result<Credits>;
    async fn videos(&self, kind: MediaKind, id: i64) -> Result<Vec<Video>>;
    async fn similar(&self, kind: MediaKind, id: i64) -> Result<Vec<ContentItem>>;
    async fn season_details(&self, show_id: i64, season_number: u32) -> Result<Season>;
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = format!("displayr/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(config.http_timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            credential: config.credential.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let mut url = format!(
            "{}{}?language={}",
            self.base_url,
            path,
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        if let Credential::ApiKey(key) = &self.credential {
            url.push_str("&api_key=");
            url.push_str(&urlencoding::encode(key));
        }

        let mut request = self.client.get(&url);
        if let Credential::Bearer(token) = &self.credential {
            request = request.bearer_auth(token);
        }

        debug!(path = %path, "TMDB request");
        let res = request.send().await.context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {} {}", path, status, text));
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("JSON parse failed for {path}"))?;
        Ok(parsed)
    }

    async fn list(
        &self,
        path: &str,
        params: &[(&str, String)],
        fallback: Option<MediaKind>,
    ) -> Result<Vec<ContentItem>> {
        let page: Page<ListItem> = self.get_json(path, params).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(|item| item.into_content(fallback))
            .collect())
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn trending(&self, kind: TrendingKind, window: TimeWindow) -> Result<Vec<ContentItem>> {
        let path = format!("/trending/{}/{}", kind.as_path(), window.as_path());
        let fallback = match kind {
            TrendingKind::Movie => Some(MediaKind::Movie),
            TrendingKind::Tv => Some(MediaKind::Tv),
            TrendingKind::All => None,
        };
        self.list(&path, &[], fallback).await
    }

    async fn discover_movies(&self, genre_id: i64) -> Result<Vec<ContentItem>> {
        self.list(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
            Some(MediaKind::Movie),
        )
        .await
    }

    async fn search_multi(&self, query: &str) -> Result<Vec<ContentItem>> {
        self.list(
            "/search/multi",
            &[("query", query.to_string()), ("include_adult", "false".to_string())],
            None,
        )
        .await
    }

    async fn movie_details(&self, id: i64) -> Result<MovieDetails> {
        let detail: MovieDetail = self.get_json(&format!("/movie/{id}"), &[]).await?;
        Ok(detail.into_model())
    }

    async fn tv_details(&self, id: i64) -> Result<TvDetails> {
        let detail: ShowDetail = self.get_json(&format!("/tv/{id}"), &[]).await?;
        Ok(detail.into_model())
    }

    async fn credits(&self, kind: MediaKind, id: i64) -> Result<Credits> {
        let credits: CreditsWire = self
            .get_json(&format!("/{}/{id}/credits", kind.as_path()), &[])
            .await?;
        let cast = credits
            .cast
            .into_iter()
            .map(|c| Person {
                id: c.id,
                name: c.name,
                profile_path: non_empty(c.profile_path),
                role: c.character.unwrap_or_default(),
            })
            .collect();
        let crew = credits
            .crew
            .into_iter()
            .map(|c| Person {
                id: c.id,
                name: c.name,
                profile_path: non_empty(c.profile_path),
                role: c.job.unwrap_or_default(),
            })
            .collect();
        Ok(shape_credits(cast, crew))
    }

    async fn videos(&self, kind: MediaKind, id: i64) -> Result<Vec<Video>> {
        let videos: Page<VideoWire> = self
            .get_json(&format!("/{}/{id}/videos", kind.as_path()), &[])
            .await?;
        Ok(videos
            .results
            .into_iter()
            .map(|v| Video {
                site: v.site,
                key: v.key,
                video_type: v.video_type,
                name: v.name.unwrap_or_default(),
            })
            .collect())
    }

    async fn similar(&self, kind: MediaKind, id: i64) -> Result<Vec<ContentItem>> {
        self.list(&format!("/{}/{id}/similar", kind.as_path()), &[], Some(kind))
            .await
    }

    async fn season_details(&self, show_id: i64, season_number: u32) -> Result<Season> {
        let season: SeasonWire = self
            .get_json(&format!("/tv/{show_id}/season/{season_number}"), &[])
            .await?;
        Ok(season.into_model())
    }
}

/// Picks the first YouTube trailer, falling back to the first YouTube teaser.
pub fn select_trailer(videos: &[Video]) -> Option<Trailer> {
    let youtube = |v: &&Video| v.site.eq_ignore_ascii_case("YouTube");
    videos
        .iter()
        .filter(youtube)
        .find(|v| v.video_type == "Trailer")
        .or_else(|| videos.iter().filter(youtube).find(|v| v.video_type == "Teaser"))
        .map(|v| Trailer {
            site: v.site.clone(),
            key: v.key.clone(),
            video_type: v.video_type.clone(),
        })
}

pub fn shape_credits(cast: Vec<Person>, crew: Vec<Person>) -> Credits {
    let director = crew
        .iter()
        .find(|c| c.role == "Director")
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_CREDIT.to_string());
    let cinematographer = crew
        .iter()
        .find(|c| c.role == "Director of Photography" || c.role == "Cinematographer")
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_CREDIT.to_string());
    Credits {
        cast,
        crew,
        director,
        cinematographer,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ListItem {
    id: i64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

impl ListItem {
    /// `None` for entries that are neither movie nor tv (multi-search people).
    fn into_content(self, fallback: Option<MediaKind>) -> Option<ContentItem> {
        let kind = match self.media_type.as_deref() {
            Some(tag) => MediaKind::parse(tag)?,
            None => fallback?,
        };
        let item = match kind {
            MediaKind::Movie => ContentItem::Movie(Movie {
                id: self.id,
                title: self.title.or(self.name).unwrap_or_default(),
                overview: self.overview.unwrap_or_default(),
                poster_path: non_empty(self.poster_path),
                backdrop_path: non_empty(self.backdrop_path),
                popularity: self.popularity.unwrap_or_default(),
                vote_average: self.vote_average.unwrap_or_default(),
                release_date: non_empty(self.release_date),
                genre_ids: self.genre_ids,
            }),
            MediaKind::Tv => ContentItem::Tv(TvShow {
                id: self.id,
                name: self.name.or(self.title).unwrap_or_default(),
                overview: self.overview.unwrap_or_default(),
                poster_path: non_empty(self.poster_path),
                backdrop_path: non_empty(self.backdrop_path),
                popularity: self.popularity.unwrap_or_default(),
                vote_average: self.vote_average.unwrap_or_default(),
                first_air_date: non_empty(self.first_air_date),
                genre_ids: self.genre_ids,
            }),
        };
        Some(item)
    }
}

#[derive(Debug, Deserialize)]
struct MovieDetail {
    id: i64,
    title: String,
    tagline: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
    #[serde(default)]
    genres: Vec<Genre>,
}

impl MovieDetail {
    fn into_model(self) -> MovieDetails {
        MovieDetails {
            id: self.id,
            title: self.title,
            tagline: non_empty(self.tagline),
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            release_date: non_empty(self.release_date),
            runtime: self.runtime,
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or_default(),
            genres: self.genres,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShowDetail {
    id: i64,
    name: String,
    tagline: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    seasons: Vec<SeasonWire>,
}

impl ShowDetail {
    fn into_model(self) -> TvDetails {
        let seasons: Vec<Season> = self.seasons.into_iter().map(SeasonWire::into_model).collect();
        TvDetails {
            id: self.id,
            name: self.name,
            tagline: non_empty(self.tagline),
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            first_air_date: non_empty(self.first_air_date),
            episode_run_time: self.episode_run_time,
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or_default(),
            number_of_seasons: self.number_of_seasons.unwrap_or(seasons.len() as u32),
            number_of_episodes: self.number_of_episodes.unwrap_or_default(),
            genres: self.genres,
            seasons,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonWire {
    #[serde(default)]
    id: i64,
    season_number: u32,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    air_date: Option<String>,
    episode_count: Option<u32>,
    #[serde(default)]
    episodes: Vec<EpisodeWire>,
}

impl SeasonWire {
    fn into_model(self) -> Season {
        let episodes: Vec<Episode> = self
            .episodes
            .into_iter()
            .map(|e| Episode {
                id: e.id,
                episode_number: e.episode_number,
                name: e.name.unwrap_or_default(),
                overview: e.overview.unwrap_or_default(),
                air_date: non_empty(e.air_date),
                still_path: non_empty(e.still_path),
                vote_average: e.vote_average,
                runtime: e.runtime,
            })
            .collect();
        Season {
            id: self.id,
            season_number: self.season_number,
            name: self
                .name
                .unwrap_or_else(|| format!("Season {}", self.season_number)),
            overview: non_empty(self.overview),
            poster_path: non_empty(self.poster_path),
            air_date: non_empty(self.air_date),
            episode_count: self.episode_count.unwrap_or(episodes.len() as u32),
            episodes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeWire {
    id: i64,
    episode_number: u32,
    name: Option<String>,
    overview: Option<String>,
    air_date: Option<String>,
    still_path: Option<String>,
    vote_average: Option<f64>,
    runtime: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CreditsWire {
    #[serde(default)]
    cast: Vec<CastWire>,
    #[serde(default)]
    crew: Vec<CrewWire>,
}

#[derive(Debug, Deserialize)]
struct CastWire {
    id: i64,
    name: String,
    profile_path: Option<String>,
    character: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrewWire {
    id: i64,
    name: String,
    profile_path: Option<String>,
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoWire {
    site: String,
    #[serde(rename = "type")]
    video_type: String,
    key: String,
    name: Option<String>,
}
