use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use displayr::app::{build_router, AppState};
use displayr::models::{
    ContentItem, Credits, Episode, Genre, MediaKind, Movie, MovieDetails, Person, Season,
    TimeWindow, TrendingKind, TvDetails, TvShow, Video,
};
use displayr::tmdb::{shape_credits, TmdbApi};
use displayr::views::ImageBase;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

const SHOW_ID: i64 = 2098;
const MOVIE_ID: i64 = 268;
const FAILING_SEASON: u32 = 2;

fn movie_item(id: i64, title: &str) -> ContentItem {
    ContentItem::Movie(Movie {
        id,
        title: title.to_string(),
        overview: format!("{title} overview"),
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: None,
        popularity: 50.0,
        vote_average: 7.25,
        release_date: Some("1989-06-23".to_string()),
        genre_ids: vec![28, 14],
    })
}

fn show_item(id: i64, name: &str) -> ContentItem {
    ContentItem::Tv(TvShow {
        id,
        name: name.to_string(),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        popularity: 40.0,
        vote_average: 8.1,
        first_air_date: Some("1999-01-10".to_string()),
        genre_ids: vec![16],
    })
}

fn stub_season(number: u32) -> Season {
    Season {
        id: 100 + number as i64,
        season_number: number,
        name: if number == 0 {
            "Specials".to_string()
        } else {
            format!("Season {number}")
        },
        overview: None,
        poster_path: None,
        air_date: Some(format!("{}-01-10", 1998 + number)),
        episode_count: 13,
        episodes: Vec::new(),
    }
}

fn person(id: i64, name: &str, role: &str) -> Person {
    Person {
        id,
        name: name.to_string(),
        profile_path: None,
        role: role.to_string(),
    }
}

#[derive(Default)]
struct FakeTmdb {
    secondary_down: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeTmdb {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn secondary(&self) -> anyhow::Result<()> {
        if self.secondary_down {
            anyhow::bail!("502 Bad Gateway");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn trending(
        &self,
        kind: TrendingKind,
        window: TimeWindow,
    ) -> anyhow::Result<Vec<ContentItem>> {
        self.record(format!("trending:{}:{}", kind.as_path(), window.as_path()));
        let all = vec![movie_item(MOVIE_ID, "Batman"), show_item(SHOW_ID, "Batman Beyond")];
        Ok(all
            .into_iter()
            .filter(|i| match kind {
                TrendingKind::All => true,
                TrendingKind::Movie => i.kind() == MediaKind::Movie,
                TrendingKind::Tv => i.kind() == MediaKind::Tv,
            })
            .collect())
    }

    async fn discover_movies(&self, genre_id: i64) -> anyhow::Result<Vec<ContentItem>> {
        self.record(format!("discover:{genre_id}"));
        Ok(vec![movie_item(9, "Genre Pick")])
    }

    async fn search_multi(&self, query: &str) -> anyhow::Result<Vec<ContentItem>> {
        self.record(format!("search:{query}"));
        match query {
            "batman" => Ok(vec![
                movie_item(MOVIE_ID, "Batman"),
                show_item(SHOW_ID, "Batman Beyond"),
            ]),
            "outage" => anyhow::bail!("503 Service Unavailable"),
            _ => Ok(Vec::new()),
        }
    }

    async fn movie_details(&self, id: i64) -> anyhow::Result<MovieDetails> {
        self.record(format!("movie:{id}"));
        if id != MOVIE_ID {
            anyhow::bail!("404 Not Found");
        }
        Ok(MovieDetails {
            id,
            title: "Batman".to_string(),
            tagline: Some("Have you ever danced with the devil?".to_string()),
            overview: "Gotham.".to_string(),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            release_date: Some("1989-06-23".to_string()),
            runtime: Some(126),
            vote_average: 7.2,
            vote_count: 7000,
            genres: vec![Genre {
                id: 14,
                name: "Fantasy".to_string(),
            }],
        })
    }

    async fn tv_details(&self, id: i64) -> anyhow::Result<TvDetails> {
        self.record(format!("tv:{id}"));
        if id != SHOW_ID {
            anyhow::bail!("404 Not Found");
        }
        Ok(TvDetails {
            id,
            name: "Batman Beyond".to_string(),
            tagline: None,
            overview: "Neo-Gotham.".to_string(),
            poster_path: None,
            backdrop_path: None,
            first_air_date: Some("1999-01-10".to_string()),
            episode_run_time: vec![22, 24],
            vote_average: 8.1,
            vote_count: 900,
            number_of_seasons: 3,
            number_of_episodes: 52,
            genres: vec![],
            seasons: vec![stub_season(0), stub_season(1), stub_season(2), stub_season(3)],
        })
    }

    async fn credits(&self, _kind: MediaKind, id: i64) -> anyhow::Result<Credits> {
        self.record(format!("credits:{id}"));
        self.secondary()?;
        Ok(shape_credits(
            vec![
                person(1, "Michael Keaton", "Batman"),
                person(2, "Jack Nicholson", "Joker"),
            ],
            vec![
                person(3, "Tim Burton", "Director"),
                person(4, "Roger Pratt", "Director of Photography"),
            ],
        ))
    }

    async fn videos(&self, _kind: MediaKind, id: i64) -> anyhow::Result<Vec<Video>> {
        self.record(format!("videos:{id}"));
        self.secondary()?;
        Ok(vec![
            Video {
                site: "YouTube".to_string(),
                key: "teaser-key".to_string(),
                video_type: "Teaser".to_string(),
                name: "Teaser".to_string(),
            },
            Video {
                site: "YouTube".to_string(),
                key: "trailer-key".to_string(),
                video_type: "Trailer".to_string(),
                name: "Trailer".to_string(),
            },
        ])
    }

    async fn similar(&self, _kind: MediaKind, id: i64) -> anyhow::Result<Vec<ContentItem>> {
        self.record(format!("similar:{id}"));
        self.secondary()?;
        Ok(vec![movie_item(364, "Batman Returns")])
    }

    async fn season_details(&self, show_id: i64, season_number: u32) -> anyhow::Result<Season> {
        self.record(format!("season:{show_id}/{season_number}"));
        if show_id != SHOW_ID || season_number == FAILING_SEASON {
            anyhow::bail!("500 Internal Server Error");
        }
        Ok(Season {
            overview: Some(format!("Season {season_number} overview")),
            episodes: (1..=3)
                .map(|n| Episode {
                    id: n as i64,
                    episode_number: n,
                    name: format!("Episode {n}"),
                    overview: String::new(),
                    air_date: Some("1999-01-10".to_string()),
                    still_path: None,
                    vote_average: Some(7.5),
                    runtime: Some(22),
                })
                .collect(),
            ..stub_season(season_number)
        })
    }
}

fn app_with(api: Arc<FakeTmdb>) -> Router {
    build_router(AppState::new(api, ImageBase::new("https://img.test/t/p")))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let cache = res
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, cache, body)
}

#[tokio::test]
async fn search_to_tv_detail_keeps_every_season() {
    let api = Arc::new(FakeTmdb::default());
    let app = app_with(api.clone());

    let (status, _, body) = get(&app, "/search?q=batman").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "results");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    let tv = results.iter().find(|r| r["kind"] == "tv").unwrap();
    let href = tv["href"].as_str().unwrap();
    assert_eq!(href, "/tv/2098-batman-beyond");

    let (status, cache, show) = get(&app, href).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some("public, max-age=86400"));
    assert_eq!(show["name"], "Batman Beyond");
    assert_eq!(show["episode_runtime"], "22m");
    assert_eq!(show["director"], "Tim Burton");
    assert_eq!(show["trailer"]["key"], "trailer-key");

    let seasons = show["seasons"].as_array().unwrap();
    assert_eq!(seasons.len(), 4);
    assert_eq!(seasons[1]["episodes"].as_array().unwrap().len(), 3);
    assert_eq!(seasons[1]["overview"], "Season 1 overview");
    assert_eq!(seasons[2]["name"], "Season 2");
    assert!(seasons[2]["episodes"].as_array().unwrap().is_empty());
    assert_eq!(seasons[2]["href"], "/tv/2098/season/2");

    let season_calls = api
        .calls()
        .iter()
        .filter(|c| c.starts_with("season:"))
        .count();
    assert_eq!(season_calls, 4);
}

#[tokio::test]
async fn movie_detail_survives_secondary_failures() {
    let api = Arc::new(FakeTmdb {
        secondary_down: true,
        ..FakeTmdb::default()
    });
    let app = app_with(api);

    let (status, _, movie) = get(&app, "/movies/268-batman").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie["title"], "Batman");
    assert_eq!(movie["runtime"], "2h 6m");
    assert_eq!(movie["year"], "1989");
    assert_eq!(movie["release_date"], "June 23, 1989");
    assert_eq!(movie["rating"], "7.2");
    assert_eq!(movie["poster_url"], "https://img.test/t/p/w500/poster.jpg");
    assert_eq!(movie["director"], "Unknown");
    assert_eq!(movie["cinematographer"], "Unknown");
    assert!(movie["cast"].as_array().unwrap().is_empty());
    assert!(movie["trailer"].is_null());
    assert!(movie["similar"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn movie_detail_includes_credits_and_similar() {
    let app = app_with(Arc::new(FakeTmdb::default()));
    let (status, _, movie) = get(&app, "/movies/268").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie["cinematographer"], "Roger Pratt");
    assert_eq!(movie["cast"][1]["role"], "Joker");
    assert_eq!(movie["similar"][0]["href"], "/movies/364-batman-returns");
    assert_eq!(
        movie["trailer"]["embed_url"],
        "https://www.youtube.com/embed/trailer-key?autoplay=1"
    );
}

#[tokio::test]
async fn bad_slugs_and_unknown_ids_are_not_found() {
    let api = Arc::new(FakeTmdb::default());
    let app = app_with(api.clone());

    let (status, _, body) = get(&app, "/movies/batman").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "not_found");
    assert!(api.calls().is_empty());

    let (status, _, _) = get(&app, "/tv/77-unknown-show").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(&app, "/tv/2098/season/two").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = get(&app, "/people/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "not_found");
}

#[tokio::test]
async fn home_filters_trending_feed() {
    let api = Arc::new(FakeTmdb::default());
    let app = app_with(api.clone());

    let (status, cache, body) = get(&app, "/?filter=tv&window=week").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some("public, max-age=3600"));
    assert_eq!(body["filter"], "tv");
    assert_eq!(body["window"], "week");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "tv");
    assert_eq!(body["spotlight"]["title"], "Batman Beyond");
    assert_eq!(body["spotlight"]["director"], "Tim Burton");
    assert_eq!(body["spotlight"]["cinematographer"], "Roger Pratt");
    assert_eq!(body["spotlight"]["trailer"]["key"], "trailer-key");
    assert_eq!(body["spotlight"]["href"], "/tv/2098-batman-beyond");

    let (_, _, body) = get(&app, "/?filter=people").await;
    assert_eq!(body["filter"], "all");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let (_, _, body) = get(&app, "/?genre=28").await;
    assert_eq!(body["genre"]["name"], "Action");
    assert_eq!(body["items"][0]["title"], "Genre Pick");

    let feed_calls: Vec<String> = api
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("trending:") || c.starts_with("discover:"))
        .collect();
    assert_eq!(
        feed_calls,
        vec![
            "trending:tv:week".to_string(),
            "trending:all:day".to_string(),
            "discover:28".to_string(),
        ]
    );
}

#[tokio::test]
async fn home_spotlight_falls_back_to_unknown_crew() {
    let api = Arc::new(FakeTmdb {
        secondary_down: true,
        ..FakeTmdb::default()
    });
    let app = app_with(api.clone());

    let (status, _, body) = get(&app, "/?filter=movie").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spotlight"]["title"], "Batman");
    assert_eq!(body["spotlight"]["director"], "Unknown");
    assert!(body["spotlight"]["trailer"].is_null());
    let calls = api.calls();
    assert!(calls.contains(&"credits:268".to_string()));
    assert!(calls.contains(&"videos:268".to_string()));
}

#[tokio::test]
async fn search_view_states() {
    let api = Arc::new(FakeTmdb::default());
    let app = app_with(api.clone());

    let (_, _, body) = get(&app, "/search").await;
    assert_eq!(body["state"], "idle");

    let (_, _, body) = get(&app, "/search?q=%20b%20").await;
    assert_eq!(body["state"], "empty");
    assert!(api.calls().is_empty());

    let (_, _, body) = get(&app, "/search?q=zzzz").await;
    assert_eq!(body["state"], "empty");
    assert!(body["error"].is_null());

    let (_, _, body) = get(&app, "/search?q=outage").await;
    assert_eq!(body["state"], "error");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn season_page_lists_episodes() {
    let app = app_with(Arc::new(FakeTmdb::default()));

    let (status, _, page) = get(&app, "/tv/2098-batman-beyond/season/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["show_name"], "Batman Beyond");
    assert_eq!(page["show_href"], "/tv/2098-batman-beyond");
    let episodes = page["season"]["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 3);
    assert_eq!(episodes[0]["runtime"], "22m");
    assert_eq!(episodes[0]["rating"], "7.5");

    let (status, _, _) = get(&app, "/tv/2098/season/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn genres_and_health() {
    let app = app_with(Arc::new(FakeTmdb::default()));
    let (status, _, body) = get(&app, "/genres").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 19);

    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}
