//! Scroll and resize notifications for the article view.
//!
//! The terminal loop feeds events in with [`Viewport::emit_scroll`] and
//! [`Viewport::emit_resize`]; components subscribe listeners that turn an
//! event into an optional [`Message`]. Listeners are plain values owned by the
//! viewport, so tests can drive synthetic events without a terminal.

use crate::app::Message;

/// Geometry of the scrollable article list, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub viewport_height: usize,
    pub scroll_offset: usize,
    pub content_height: usize,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self, threshold: usize) -> bool {
        self.viewport_height + self.scroll_offset >= self.content_height.saturating_sub(threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

pub type ScrollListener = Box<dyn Fn(&ScrollMetrics) -> Option<Message>>;
pub type ResizeListener = Box<dyn Fn(u32) -> Option<Message>>;

#[derive(Default)]
pub struct Viewport {
    scroll: Vec<(Subscription, ScrollListener)>,
    resize: Vec<(Subscription, ResizeListener)>,
    next_id: u64,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_subscription(&mut self) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn on_scroll(&mut self, listener: ScrollListener) -> Subscription {
        let id = self.next_subscription();
        self.scroll.push((id, listener));
        id
    }

    pub fn on_resize(&mut self, listener: ResizeListener) -> Subscription {
        let id = self.next_subscription();
        self.resize.push((id, listener));
        id
    }

    /// Remove a listener of either kind. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listener_count();
        self.scroll.retain(|(id, _)| *id != subscription);
        self.resize.retain(|(id, _)| *id != subscription);
        self.listener_count() < before
    }

    pub fn emit_scroll(&self, metrics: &ScrollMetrics) -> Vec<Message> {
        self.scroll.iter().filter_map(|(_, l)| l(metrics)).collect()
    }

    pub fn emit_resize(&self, width: u32) -> Vec<Message> {
        self.resize.iter().filter_map(|(_, l)| l(width)).collect()
    }

    pub fn scroll_listeners(&self) -> usize {
        self.scroll.len()
    }

    pub fn resize_listeners(&self) -> usize {
        self.resize.len()
    }

    pub fn listener_count(&self) -> usize {
        self.scroll.len() + self.resize.len()
    }
}
