//! UI feedback side channel: loading indicator and page title.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::LiveRoute;

/// Closes a loading indicator when dropped.
///
/// Returned by [`UiFeedback::begin_loading`]; holding it across an await
/// keeps the indicator up, and every exit path closes it.
#[must_use = "dropping the handle closes the loading indicator immediately"]
pub struct LoadingHandle {
    close: Option<Box<dyn FnOnce() + Send>>,
}

impl LoadingHandle {
    pub fn new(close: impl FnOnce() + Send + 'static) -> Self {
        Self {
            close: Some(Box::new(close)),
        }
    }

    pub fn noop() -> Self {
        Self { close: None }
    }

    pub fn close(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(close) = self.close.take() {
            close();
        }
    }
}

impl Drop for LoadingHandle {
    fn drop(&mut self) {
        self.fire();
    }
}

impl core::fmt::Debug for LoadingHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoadingHandle")
            .field("open", &self.close.is_some())
            .finish()
    }
}

/// Presentation hooks the guard calls into.
pub trait UiFeedback: Send + Sync {
    /// Show a loading indicator for the duration of a registration pass.
    fn begin_loading(&self) -> LoadingHandle {
        LoadingHandle::noop()
    }

    /// Update the window/page title for a committed route.
    fn set_page_title(&self, route: &LiveRoute);
}

/// Feedback sink that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopUi;

impl UiFeedback for NoopUi {
    fn set_page_title(&self, _route: &LiveRoute) {}
}

/// Feedback sink that records what it was told. Used by tests and the demo.
#[derive(Debug, Default)]
pub struct RecordingUi {
    titles: Mutex<Vec<String>>,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_title(&self) -> Option<String> {
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn loading_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn loading_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl UiFeedback for RecordingUi {
    fn begin_loading(&self) -> LoadingHandle {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let closed = Arc::clone(&self.closed);
        LoadingHandle::new(move || {
            closed.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn set_page_title(&self, route: &LiveRoute) {
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.meta.title.clone());
    }
}
