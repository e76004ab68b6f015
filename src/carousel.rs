//! Looping carousel for the home page. The item list is repeated so the
//! strip can scroll in either direction; the item nearest the container
//! center is "centered" and, once scrolling settles, snapped into place.
//!
//! Layout is owned by whoever embeds the carousel and reached through the
//! [`Viewport`] trait, so the state machine itself never touches a screen.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::debounce::Debouncer;

pub const LOOP_FACTOR: usize = 3;
/// Viewports narrower than this scroll horizontally.
pub const NARROW_BREAKPOINT: f64 = 768.0;
pub const SETTLE_DELAY: Duration = Duration::from_millis(350);

const FOCUSED_SCALE: f64 = 1.1;
const RESTING_SCALE: f64 = 0.9;
const DIMMED_OPACITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn for_width(width: f64) -> Self {
        if width < NARROW_BREAKPOINT {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn center(&self, axis: Axis) -> f64 {
        self.start(axis) + self.size(axis) / 2.0
    }
}

/// `factor` back-to-back copies of a list. Items are stored once.
#[derive(Debug, Clone)]
pub struct LoopedSequence<T> {
    items: Vec<T>,
    factor: usize,
}

impl<T> LoopedSequence<T> {
    /// Factors below [`LOOP_FACTOR`] are raised to it.
    pub fn new(items: Vec<T>, factor: usize) -> Self {
        Self {
            items,
            factor: factor.max(LOOP_FACTOR),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len() * self.factor
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn original_len(&self) -> usize {
        self.items.len()
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    pub fn original_index(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        Some(index % self.items.len())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.original_index(index).and_then(|i| self.items.get(i))
    }

    pub fn originals(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.factor).flat_map(move |_| self.items.iter())
    }

    /// First index of the middle copy.
    pub fn middle_start(&self) -> usize {
        self.items.len() * (self.factor / 2)
    }
}

/// Index of the rect whose center is closest to the container center along
/// `axis`. Ties go to the lowest index.
pub fn nearest_to_center(items: &[Rect], container: &Rect, axis: Axis) -> Option<usize> {
    let target = container.center(axis);
    let mut best: Option<(usize, f64)> = None;
    for (i, rect) in items.iter().enumerate() {
        let distance = (rect.center(axis) - target).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Scroll offset that puts `item` in the middle of `container`.
pub fn snap_offset(container: &Rect, item: &Rect, scroll: f64, axis: Axis) -> f64 {
    let relative = item.start(axis) - container.start(axis);
    let desired = (container.size(axis) - item.size(axis)) / 2.0;
    scroll + relative - desired
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    pub scale: f64,
    pub opacity: f64,
}

/// Layout surface the carousel is drawn on. Rects are in one coordinate
/// space and reflect the current scroll position.
pub trait Viewport {
    fn container(&self) -> Rect;
    fn item_rects(&self) -> Vec<Rect>;
    fn scroll_offset(&self, axis: Axis) -> f64;
    fn scroll_to(&mut self, axis: Axis, offset: f64, behavior: ScrollBehavior);
}

pub struct CarouselController<T, V> {
    sequence: LoopedSequence<T>,
    viewport: V,
    centered: usize,
    scrolling: bool,
    axis: Axis,
}

impl<T, V: Viewport> CarouselController<T, V> {
    pub fn new(viewport: V, viewport_width: f64) -> Self {
        Self {
            sequence: LoopedSequence::new(Vec::new(), LOOP_FACTOR),
            viewport,
            centered: 0,
            scrolling: false,
            axis: Axis::for_width(viewport_width),
        }
    }

    /// Replaces the list and jumps to the first item of the middle copy.
    pub fn load(&mut self, items: Vec<T>) {
        self.sequence = LoopedSequence::new(items, LOOP_FACTOR);
        self.scrolling = false;
        self.centered = 0;
        if self.sequence.is_empty() {
            return;
        }
        let start = self.sequence.middle_start();
        self.center_on(start, ScrollBehavior::Instant);
        debug!(
            items = self.sequence.original_len(),
            looped = self.sequence.len(),
            centered = start,
            "Carousel loaded"
        );
    }

    /// Recomputes the centered index from the current layout.
    pub fn recenter(&mut self) -> Option<usize> {
        if self.sequence.is_empty() {
            return None;
        }
        let rects = self.viewport.item_rects();
        let count = rects.len().min(self.sequence.len());
        let container = self.viewport.container();
        if let Some(index) = nearest_to_center(&rects[..count], &container, self.axis) {
            self.centered = index;
        }
        Some(self.centered)
    }

    pub fn on_scroll(&mut self) -> Option<usize> {
        self.scrolling = true;
        self.recenter()
    }

    /// Wheel input over the page. Narrow layouts scroll natively.
    pub fn on_wheel(&mut self, delta: f64) -> Option<usize> {
        if self.axis == Axis::Horizontal {
            return None;
        }
        let offset = self.viewport.scroll_offset(self.axis) + delta;
        self.viewport.scroll_to(self.axis, offset, ScrollBehavior::Instant);
        self.on_scroll()
    }

    /// Settle-timer expiry: stop scrolling and snap the centered item.
    pub fn settle(&mut self) {
        self.scrolling = false;
        if self.sequence.is_empty() {
            return;
        }
        self.center_on(self.centered, ScrollBehavior::Smooth);
    }

    pub fn on_resize(&mut self, viewport_width: f64) -> Option<usize> {
        let axis = Axis::for_width(viewport_width);
        if axis != self.axis {
            debug!(?axis, viewport_width, "Carousel orientation changed");
        }
        self.axis = axis;
        self.recenter()
    }

    /// Jumps to a looped index. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.sequence.len() {
            return false;
        }
        self.scrolling = false;
        self.center_on(index, ScrollBehavior::Smooth);
        true
    }

    /// Moves the centered index by `delta`, wrapping around the looped list.
    pub fn step(&mut self, delta: isize) -> Option<usize> {
        let len = self.sequence.len();
        if len == 0 {
            return None;
        }
        let next = (self.centered as isize + delta).rem_euclid(len as isize) as usize;
        self.select(next);
        Some(next)
    }

    pub fn visual(&self, index: usize) -> ItemVisual {
        let centered = index == self.centered;
        ItemVisual {
            scale: if centered && !self.scrolling {
                FOCUSED_SCALE
            } else {
                RESTING_SCALE
            },
            opacity: if centered { 1.0 } else { DIMMED_OPACITY },
        }
    }

    pub fn centered_index(&self) -> Option<usize> {
        (!self.sequence.is_empty()).then_some(self.centered)
    }

    pub fn centered_item(&self) -> Option<&T> {
        self.sequence.get(self.centered)
    }

    /// Original item `offset` places away from the centered one, wrapping.
    pub fn neighbor(&self, offset: isize) -> Option<&T> {
        let n = self.sequence.original_len();
        let origin = self.sequence.original_index(self.centered)?;
        let index = (origin as isize + offset).rem_euclid(n as isize) as usize;
        self.sequence.originals().get(index)
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn sequence(&self) -> &LoopedSequence<T> {
        &self.sequence
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    fn center_on(&mut self, index: usize, behavior: ScrollBehavior) {
        self.centered = index;
        let rects = self.viewport.item_rects();
        let Some(item) = rects.get(index) else {
            return;
        };
        let container = self.viewport.container();
        let scroll = self.viewport.scroll_offset(self.axis);
        let offset = snap_offset(&container, item, scroll, self.axis);
        self.viewport.scroll_to(self.axis, offset, behavior);
    }
}

/// Shared handle that owns the settle timer. Scroll events restart it;
/// explicit navigation cancels it.
pub struct Carousel<T, V> {
    inner: Arc<Mutex<CarouselController<T, V>>>,
    settle: Debouncer,
}

impl<T, V> Carousel<T, V>
where
    T: Send + 'static,
    V: Viewport + Send + 'static,
{
    pub fn new(controller: CarouselController<T, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
            settle: Debouncer::new(SETTLE_DELAY),
        }
    }

    pub async fn load(&mut self, items: Vec<T>) {
        self.settle.cancel();
        self.inner.lock().await.load(items);
    }

    pub async fn on_scroll(&mut self) -> Option<usize> {
        let centered = self.inner.lock().await.on_scroll();
        self.arm_settle();
        centered
    }

    pub async fn on_wheel(&mut self, delta: f64) -> Option<usize> {
        let centered = self.inner.lock().await.on_wheel(delta);
        if centered.is_some() {
            self.arm_settle();
        }
        centered
    }

    pub async fn on_resize(&mut self, viewport_width: f64) -> Option<usize> {
        self.inner.lock().await.on_resize(viewport_width)
    }

    pub async fn select(&mut self, index: usize) -> bool {
        self.settle.cancel();
        self.inner.lock().await.select(index)
    }

    pub async fn step(&mut self, delta: isize) -> Option<usize> {
        self.settle.cancel();
        self.inner.lock().await.step(delta)
    }

    pub async fn lock(&self) -> MutexGuard<'_, CarouselController<T, V>> {
        self.inner.lock().await
    }

    fn arm_settle(&mut self) {
        let inner = self.inner.clone();
        self.settle.call(async move {
            inner.lock().await.settle();
        });
    }
}
