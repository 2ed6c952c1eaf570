use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Weak,
};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{
    controller::{ListController, LoadOutcome},
    source::RemoteListSource,
};

pub const DEFAULT_BOTTOM_EPSILON: f64 = 1.0;

/// Geometry of the scroll container at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_offset: f64,
    pub visible_height: f64,
    pub total_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_offset: f64, visible_height: f64, total_height: f64) -> Self {
        Self {
            scroll_offset,
            visible_height,
            total_height,
        }
    }

    /// Metrics for a container scrolled all the way down.
    pub fn at_bottom(visible_height: f64, total_height: f64) -> Self {
        Self::new((total_height - visible_height).max(0.0), visible_height, total_height)
    }

    /// Sub-pixel offsets never line up exactly, so the bottom counts as
    /// reached within `epsilon`.
    pub fn is_at_bottom(&self, epsilon: f64) -> bool {
        self.scroll_offset + self.visible_height + epsilon >= self.total_height
    }
}

/// Turns "scrolled to the bottom" into `load_more` calls on a list.
///
/// Holds only a weak reference, so a list whose owner went away is never
/// driven; `detach` stops it explicitly.
pub struct ScrollTrigger<S: RemoteListSource> {
    controller: Weak<ListController<S>>,
    epsilon: f64,
    attached: AtomicBool,
}

impl<S: RemoteListSource + 'static> ScrollTrigger<S> {
    pub fn attach(controller: &Arc<ListController<S>>) -> Self {
        debug!(list = %controller.label(), "scroll: trigger attached");
        Self {
            controller: Arc::downgrade(controller),
            epsilon: DEFAULT_BOTTOM_EPSILON,
            attached: AtomicBool::new(true),
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.max(0.0);
        self
    }

    pub fn detach(&self) {
        if self.attached.swap(false, Ordering::SeqCst) {
            debug!("scroll: trigger detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst) && self.controller.strong_count() > 0
    }

    /// Starts a `load_more` on its own task when the bottom is reached and the
    /// list has a next page. The returned handle is only for callers that want
    /// to wait for that page.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Option<JoinHandle<LoadOutcome>> {
        if !self.attached.load(Ordering::SeqCst) || !metrics.is_at_bottom(self.epsilon) {
            return None;
        }
        let controller = self.controller.upgrade()?;
        if controller.is_disposed() || !controller.has_next_cursor().await {
            return None;
        }
        debug!(list = %controller.label(), "scroll: bottom reached, loading more");
        Some(tokio::spawn(async move { controller.load_more().await }))
    }

    /// Feeds scroll events into `on_scroll` until the sender is dropped or the
    /// trigger stops being attached.
    pub async fn run(&self, mut scroll_rx: mpsc::Receiver<ScrollMetrics>) {
        while let Some(metrics) = scroll_rx.recv().await {
            if !self.is_attached() {
                break;
            }
            let _ = self.on_scroll(metrics).await;
        }
    }
}

#[cfg(test)]
#[path = "tests/scroll_tests.rs"]
mod tests;
