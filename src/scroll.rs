use tracing::debug;

use crate::app::Message;
use crate::viewport::{Subscription, Viewport};

pub const DEFAULT_THRESHOLD: usize = 4;

/// Emits [`Message::LoadMore`] whenever the list is scrolled near its end.
///
/// There is no debounce: every qualifying scroll event produces a message and
/// the feed's single-flight guard drops the extras.
#[derive(Debug)]
pub struct ScrollTrigger {
    threshold: usize,
    subscription: Option<Subscription>,
}

impl ScrollTrigger {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            subscription: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe to scroll events. Attaching twice keeps the first listener.
    pub fn attach(&mut self, viewport: &mut Viewport) {
        if self.is_attached() {
            return;
        }
        let threshold = self.threshold;
        let id = viewport.on_scroll(Box::new(move |metrics| {
            metrics
                .is_near_bottom(threshold)
                .then_some(Message::LoadMore)
        }));
        debug!(threshold, "scroll trigger attached");
        self.subscription = Some(id);
    }

    pub fn detach(&mut self, viewport: &mut Viewport) {
        if let Some(id) = self.subscription.take() {
            viewport.unsubscribe(id);
            debug!("scroll trigger detached");
        }
    }
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
