use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::Message;
use crate::viewport::{Subscription, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl LayoutClass {
    pub fn label(self) -> &'static str {
        match self {
            LayoutClass::Mobile => "mobile",
            LayoutClass::Tablet => "tablet",
            LayoutClass::Desktop => "desktop",
        }
    }

    /// Rows one article takes in the list, borders excluded.
    pub fn rows_per_article(self) -> usize {
        match self {
            LayoutClass::Mobile => 2,
            LayoutClass::Tablet | LayoutClass::Desktop => 3,
        }
    }

    pub fn shows_snippet(self) -> bool {
        !matches!(self, LayoutClass::Mobile)
    }

    pub fn shows_image(self) -> bool {
        matches!(self, LayoutClass::Desktop)
    }

    /// Whether comments render beside the list instead of replacing it.
    pub fn side_panel(self) -> bool {
        matches!(self, LayoutClass::Desktop)
    }
}

/// Lower bounds (inclusive) of the tablet and desktop classes, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet: 768,
            desktop: 1024,
        }
    }
}

impl Breakpoints {
    pub fn classify(&self, width: u32) -> LayoutClass {
        if width < self.tablet {
            LayoutClass::Mobile
        } else if width < self.desktop {
            LayoutClass::Tablet
        } else {
            LayoutClass::Desktop
        }
    }
}

/// Reclassifies the layout on every resize event.
#[derive(Debug, Default)]
pub struct LayoutWatcher {
    breakpoints: Breakpoints,
    subscription: Option<Subscription>,
}

impl LayoutWatcher {
    pub fn new(breakpoints: Breakpoints) -> Self {
        Self {
            breakpoints,
            subscription: None,
        }
    }

    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn attach(&mut self, viewport: &mut Viewport) {
        if self.is_attached() {
            return;
        }
        let breakpoints = self.breakpoints;
        let id = viewport.on_resize(Box::new(move |width| {
            Some(Message::LayoutChanged(breakpoints.classify(width)))
        }));
        debug!(?breakpoints, "layout watcher attached");
        self.subscription = Some(id);
    }

    pub fn detach(&mut self, viewport: &mut Viewport) {
        if let Some(id) = self.subscription.take() {
            viewport.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(width: u32) -> LayoutClass {
        Breakpoints::default().classify(width)
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(classify(0), LayoutClass::Mobile);
        assert_eq!(classify(767), LayoutClass::Mobile);
        assert_eq!(classify(768), LayoutClass::Tablet);
        assert_eq!(classify(1023), LayoutClass::Tablet);
        assert_eq!(classify(1024), LayoutClass::Desktop);
        assert_eq!(classify(u32::MAX), LayoutClass::Desktop);
    }

    #[test]
    fn custom_breakpoints() {
        let bp = Breakpoints {
            tablet: 400,
            desktop: 900,
        };
        assert_eq!(bp.classify(399), LayoutClass::Mobile);
        assert_eq!(bp.classify(400), LayoutClass::Tablet);
        assert_eq!(bp.classify(900), LayoutClass::Desktop);
    }

    #[test]
    fn watcher_emits_class_on_resize() {
        let mut viewport = Viewport::new();
        let mut watcher = LayoutWatcher::default();
        watcher.attach(&mut viewport);

        assert_eq!(
            viewport.emit_resize(767),
            vec![Message::LayoutChanged(LayoutClass::Mobile)]
        );
        assert_eq!(
            viewport.emit_resize(1024),
            vec![Message::LayoutChanged(LayoutClass::Desktop)]
        );
    }

    #[test]
    fn detached_watcher_is_silent() {
        let mut viewport = Viewport::new();
        let mut watcher = LayoutWatcher::default();
        watcher.attach(&mut viewport);
        watcher.detach(&mut viewport);
        assert!(viewport.emit_resize(500).is_empty());
        assert_eq!(viewport.resize_listeners(), 0);
    }

    #[test]
    fn mobile_drops_snippet() {
        assert!(!LayoutClass::Mobile.shows_snippet());
        assert!(LayoutClass::Tablet.shows_snippet());
        assert!(LayoutClass::Desktop.side_panel());
        assert!(!LayoutClass::Tablet.side_panel());
    }
}
