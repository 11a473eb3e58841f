//! Help text generated from keymaps, so labels never drift from bindings.

use crate::app::Message;
use crate::keys::{Keymap, format_key};

/// One or more related actions shown under a single label.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Paired actions, e.g. j/k for next/prev.
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| keymap.find_key(msg).map(|(code, mods)| format_key(code, mods)))
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some(keys.join("/"))
    }

    /// `keys:label`, or None if nothing is bound.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap).map(|keys| format!("{keys}:{}", self.label))
    }

    /// (keys, label) for the overlay's two columns.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

pub fn format_items(items: &[HelpItem], keymap: &Keymap) -> String {
    items
        .iter()
        .filter_map(|item| item.format(keymap))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Compact status bar help for the article list.
pub fn articles_help() -> Vec<HelpItem> {
    use Message::{OpenUrl, Quit, SelectNext, SelectPrev, ToggleComments, ToggleHelp};
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "nav"),
        HelpItem::new(OpenUrl, "open"),
        HelpItem::new(ToggleComments, "comments"),
        HelpItem::new(ToggleHelp, "help"),
        HelpItem::new(Quit, "quit"),
    ]
}

/// Compact status bar help while the comments panel is open.
pub fn comments_help() -> Vec<HelpItem> {
    use Message::{Back, OpenUrl, ToggleComments, ToggleHelp};
    vec![
        HelpItem::pair(ToggleComments, Back, "close"),
        HelpItem::new(OpenUrl, "open"),
        HelpItem::new(ToggleHelp, "help"),
    ]
}

pub fn overlay_items() -> Vec<HelpItem> {
    use Message::{
        Back, OpenUrl, PageDown, PageUp, Quit, SelectFirst, SelectLast, SelectNext, SelectPrev,
        ToggleComments, ToggleDebug, ToggleHelp,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page down/up"),
        HelpItem::new(OpenUrl, "open in browser"),
        HelpItem::new(ToggleComments, "toggle comments"),
        HelpItem::new(Back, "close panel"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close help"),
    ]
}
