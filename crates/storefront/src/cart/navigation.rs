//! Navigation side effects requested by the cart view.

use serde::Serialize;

/// Route the checkout button leads to.
pub const CHECKOUT_ROUTE: &str = "/order/payment";

/// Where the view can send the shopper.
pub trait Navigator {
    /// Move to a fixed route.
    fn go_to(&mut self, route: &'static str);
    /// One step back in history.
    fn go_back(&mut self);
    /// Bring the top of the page into view after a page change.
    fn scroll_to_top(&mut self);
}

/// A navigation effect, as recorded for the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "route", rename_all = "camelCase")]
pub enum Navigation {
    GoTo(&'static str),
    GoBack,
    ScrollToTop,
}

/// Collects effects instead of performing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    effects: Vec<Navigation>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn effects(&self) -> &[Navigation] {
        &self.effects
    }

    #[must_use]
    pub fn into_effects(self) -> Vec<Navigation> {
        self.effects
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&mut self, route: &'static str) {
        self.effects.push(Navigation::GoTo(route));
    }

    fn go_back(&mut self) {
        self.effects.push(Navigation::GoBack);
    }

    fn scroll_to_top(&mut self) {
        self.effects.push(Navigation::ScrollToTop);
    }
}
