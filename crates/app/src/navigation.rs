//! Navigation

use std::sync::{Mutex, PoisonError};

use buckery::routes::Route;
use mockall::automock;
use tracing::debug;

/// Where the visitor is and how pages move them elsewhere.
#[automock]
pub trait Navigator: Send + Sync {
    /// Path of the page currently shown.
    fn current_path(&self) -> String;

    /// Leave the current page for `route`.
    fn navigate(&self, route: Route);
}

/// In-memory navigation history, used by the CLI and tests.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    /// History positioned on `route`.
    pub fn new(route: Route) -> Self {
        Self::at(route.path())
    }

    /// History positioned on a raw path, e.g. one with a query string.
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![path.into()]),
        }
    }

    /// Every path visited, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Paths visited after the starting page.
    pub fn redirects(&self) -> Vec<String> {
        self.entries().into_iter().skip(1).collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for History {
    fn current_path(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| Route::Home.path().to_string())
    }

    fn navigate(&self, route: Route) {
        debug!(%route, "navigating");

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.path().to_string());
    }
}
