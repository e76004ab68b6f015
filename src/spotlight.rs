//! Feature panel for the carousel's centered item: title, overview, key crew,
//! backdrop and trailer link. Credits and trailer are fetched together every
//! time the centered item changes; only the latest request may land.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::carousel::{Carousel, Viewport};
use crate::gateway::Gateway;
use crate::models::{ContentItem, MediaKind, Trailer, UNKNOWN_CREDIT};
use crate::routes::Route;
use crate::views::{ImageBase, ImageSize, TrailerView};

#[derive(Debug, Clone, PartialEq)]
pub struct Spotlight {
    pub item: ContentItem,
    pub director: String,
    pub cinematographer: String,
    pub trailer: Option<Trailer>,
}

impl Spotlight {
    /// Missing credits fall back to the unknown placeholder.
    pub async fn fetch(gateway: &Gateway, item: ContentItem) -> Self {
        let (kind, id) = (item.kind(), item.id());
        let (credits, trailer) = tokio::join!(gateway.credits(kind, id), gateway.trailer(kind, id));
        let (director, cinematographer) = match credits {
            Some(c) => (c.director, c.cinematographer),
            None => (UNKNOWN_CREDIT.to_string(), UNKNOWN_CREDIT.to_string()),
        };
        Self {
            item,
            director,
            cinematographer,
            trailer,
        }
    }

    pub fn view(&self, images: &ImageBase) -> SpotlightView {
        SpotlightView {
            id: self.item.id(),
            kind: self.item.kind(),
            title: self.item.title().to_string(),
            overview: self.item.overview().to_string(),
            director: self.director.clone(),
            cinematographer: self.cinematographer.clone(),
            backdrop_url: images.url(self.item.backdrop_path(), ImageSize::Backdrop),
            trailer: self.trailer.as_ref().map(TrailerView::from),
            href: Route::for_item(&self.item).path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotlightView {
    pub id: i64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub director: String,
    pub cinematographer: String,
    pub backdrop_url: String,
    pub trailer: Option<TrailerView>,
    pub href: String,
}

#[derive(Debug, Default)]
struct SpotlightState {
    generation: u64,
    current: Option<Spotlight>,
}

/// Holds the latest spotlight. Each focus bumps the generation; a fetch that
/// finishes under an older generation is dropped.
#[derive(Clone)]
pub struct SpotlightController {
    gateway: Gateway,
    state: Arc<Mutex<SpotlightState>>,
}

impl SpotlightController {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(SpotlightState::default())),
        }
    }

    /// Starts the credits + trailer fetch for `item` in the background.
    pub async fn focus(&self, item: ContentItem) -> JoinHandle<()> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.generation
        };
        let gateway = self.gateway.clone();
        let state = self.state.clone();
        tokio::spawn(async move {
            let id = item.id();
            let spotlight = Spotlight::fetch(&gateway, item).await;
            let mut s = state.lock().await;
            if s.generation != generation {
                debug!(
                    item_id = id,
                    generation,
                    latest = s.generation,
                    "Discarding stale spotlight"
                );
                return;
            }
            s.current = Some(spotlight);
        })
    }

    pub async fn current(&self) -> Option<Spotlight> {
        self.state.lock().await.current.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }
}

/// Carousel plus spotlight: every event that moves the centered item to a
/// different original entry refocuses the spotlight.
pub struct Gallery<V> {
    carousel: Carousel<ContentItem, V>,
    spotlight: SpotlightController,
    focused: Option<usize>,
}

impl<V> Gallery<V>
where
    V: Viewport + Send + 'static,
{
    pub fn new(carousel: Carousel<ContentItem, V>, spotlight: SpotlightController) -> Self {
        Self {
            carousel,
            spotlight,
            focused: None,
        }
    }

    pub async fn load(&mut self, items: Vec<ContentItem>) {
        self.carousel.load(items).await;
        self.focused = None;
        self.sync().await;
    }

    pub async fn on_scroll(&mut self) -> Option<usize> {
        let centered = self.carousel.on_scroll().await;
        self.sync().await;
        centered
    }

    pub async fn on_wheel(&mut self, delta: f64) -> Option<usize> {
        let centered = self.carousel.on_wheel(delta).await;
        self.sync().await;
        centered
    }

    pub async fn on_resize(&mut self, viewport_width: f64) -> Option<usize> {
        let centered = self.carousel.on_resize(viewport_width).await;
        self.sync().await;
        centered
    }

    pub async fn select(&mut self, index: usize) -> bool {
        let moved = self.carousel.select(index).await;
        self.sync().await;
        moved
    }

    pub async fn step(&mut self, delta: isize) -> Option<usize> {
        let centered = self.carousel.step(delta).await;
        self.sync().await;
        centered
    }

    pub fn carousel(&self) -> &Carousel<ContentItem, V> {
        &self.carousel
    }

    pub fn spotlight(&self) -> &SpotlightController {
        &self.spotlight
    }

    async fn sync(&mut self) {
        let (original, item) = {
            let controller = self.carousel.lock().await;
            let original = controller
                .centered_index()
                .and_then(|i| controller.sequence().original_index(i));
            (original, controller.centered_item().cloned())
        };
        if original == self.focused {
            return;
        }
        self.focused = original;
        if let Some(item) = item {
            self.spotlight.focus(item).await;
        }
    }
}
