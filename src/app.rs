use crate::config::Config;
use crate::detail::DetailAssembler;
use crate::gateway::Gateway;
use crate::models::{genre_name, movie_genres, Genre, TimeWindow, TrendingKind};
use crate::routes::parse_slug_id;
use crate::search::{run_search, SearchOptions, SearchOutcome, SearchPhase};
use crate::spotlight::{Spotlight, SpotlightView};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::views::{cards, CardView, ImageBase};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

const LIST_CACHE: &str = "public, max-age=3600";
const DETAIL_CACHE: &str = "public, max-age=86400";

#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub details: DetailAssembler,
    pub images: ImageBase,
    pub search: SearchOptions,
}

impl AppState {
    pub fn new(api: Arc<dyn TmdbApi>, images: ImageBase) -> Self {
        let gateway = Gateway::new(api);
        Self {
            details: DetailAssembler::new(gateway.clone(), images.clone()),
            gateway,
            images,
            search: SearchOptions::default(),
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let state = AppState::new(tmdb, ImageBase::new(config.image_base_url.clone()));
    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/search", get(search))
        .route("/movies/:slug", get(movie_detail))
        .route("/tv/:slug", get(tv_detail))
        .route("/tv/:slug/season/:number", get(season_detail))
        .route("/genres", get(genres))
        .route("/health", get(health))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct HomeParams {
    filter: Option<String>,
    window: Option<String>,
    genre: Option<String>,
}

#[derive(Debug, Serialize)]
struct HomePage {
    filter: TrendingKind,
    window: TimeWindow,
    genre: Option<Genre>,
    spotlight: Option<SpotlightView>,
    items: Vec<CardView>,
}

async fn home(State(state): State<AppState>, Query(params): Query<HomeParams>) -> Response {
    let filter = TrendingKind::from_filter(params.filter.as_deref());
    let window = TimeWindow::from_param(params.window.as_deref());
    let genre = params
        .genre
        .as_deref()
        .and_then(|g| g.trim().parse::<i64>().ok())
        .and_then(|id| {
            genre_name(id).map(|name| Genre {
                id,
                name: name.to_string(),
            })
        });

    let items = match &genre {
        Some(g) => state.gateway.by_genre(g.id).await,
        None => state.gateway.trending(filter, window).await,
    };
    debug!(
        filter = filter.as_path(),
        window = window.as_path(),
        genre = ?genre.as_ref().map(|g| g.id),
        items = items.len(),
        "Rendering home"
    );

    // the carousel opens centered on the first item
    let spotlight = match items.first() {
        Some(first) => Some(
            Spotlight::fetch(&state.gateway, first.clone())
                .await
                .view(&state.images),
        ),
        None => None,
    };

    let page = HomePage {
        filter,
        window,
        genre,
        spotlight,
        items: cards(&items, &state.images),
    };
    cached(LIST_CACHE, page)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchPage {
    query: String,
    state: SearchPhase,
    results: Vec<CardView>,
    error: Option<String>,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Json(SearchPage {
            query,
            state: SearchPhase::Idle,
            results: Vec::new(),
            error: None,
        })
        .into_response();
    }

    let page = match run_search(state.gateway.api().as_ref(), &query, &state.search).await {
        SearchOutcome::Results(items) => SearchPage {
            results: cards(&items, &state.images),
            query,
            state: SearchPhase::Results,
            error: None,
        },
        SearchOutcome::Empty => SearchPage {
            query,
            state: SearchPhase::Empty,
            results: Vec::new(),
            error: None,
        },
        SearchOutcome::Error(message) => SearchPage {
            query,
            state: SearchPhase::Error,
            results: Vec::new(),
            error: Some(message),
        },
    };
    Json(page).into_response()
}

async fn movie_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(id) = parse_slug_id(&slug) else {
        return not_found(&format!("No movie matches '{slug}'"));
    };
    match state.details.movie(id).await {
        Some(view) => cached(DETAIL_CACHE, view),
        None => not_found(&format!("Movie {id} not found")),
    }
}

async fn tv_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(id) = parse_slug_id(&slug) else {
        return not_found(&format!("No TV show matches '{slug}'"));
    };
    match state.details.tv(id).await {
        Some(view) => cached(DETAIL_CACHE, view),
        None => not_found(&format!("TV show {id} not found")),
    }
}

async fn season_detail(
    State(state): State<AppState>,
    Path((slug, number)): Path<(String, String)>,
) -> Response {
    let (Some(show_id), Ok(season_number)) = (parse_slug_id(&slug), number.parse::<u32>()) else {
        return not_found(&format!("No season matches '{slug}/season/{number}'"));
    };
    match state.details.season(show_id, season_number).await {
        Some(page) => cached(DETAIL_CACHE, page),
        None => not_found(&format!(
            "Season {season_number} of TV show {show_id} not found"
        )),
    }
}

async fn genres() -> Response {
    cached(LIST_CACHE, movie_genres())
}

async fn fallback(uri: Uri) -> Response {
    not_found(&format!("No page at {}", uri.path()))
}

fn cached<T: Serialize>(cache_control: &'static str, body: T) -> Response {
    ([(header::CACHE_CONTROL, cache_control)], Json(body)).into_response()
}

fn not_found(message: &str) -> Response {
    debug!("Not found: {}", message);
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "not_found", "message": message })),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
