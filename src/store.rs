use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use image::RgbaImage;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::color::{ColorExtractor, PaletteExtractor, Rgb};
use crate::domain::{CatalogEntry, Outcome};
use crate::gateway::Gateway;
use crate::remote::PokeApiClient;

/// Entries requested per list fetch.
pub const PAGE_SIZE: u32 = 20;

/// Read-only snapshot handed to presentation. The list stream and the search
/// stream each own their loading/error pair; combined views are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    /// Append-only across pagination; insertion order is fetch order.
    pub items: Vec<CatalogEntry>,
    /// Zero-based page counter driving the offset of the next fetch.
    pub cursor_page: u32,
    pub end_reached: bool,
    pub is_loading: bool,
    /// Empty string means no error.
    pub load_error: String,

    pub search_query: String,
    pub search_result: Option<CatalogEntry>,
    pub search_loading: bool,
    pub search_error: String,
}

impl CatalogState {
    /// True while either stream has a fetch outstanding.
    pub fn busy(&self) -> bool {
        self.is_loading || self.search_loading
    }

    /// Combined error view: the list stream's error wins when both are set.
    pub fn last_error(&self) -> &str {
        if !self.load_error.is_empty() {
            &self.load_error
        } else {
            &self.search_error
        }
    }

    /// Search mode is active iff the current query is non-empty.
    pub fn in_search_mode(&self) -> bool {
        !self.search_query.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FailedOp {
    Page,
    Search(String),
}

struct Inner {
    state: CatalogState,
    last_failed: Option<FailedOp>,
    color_jobs: HashMap<u32, JoinHandle<()>>,
}

/// Owns pagination, search and color-extraction state for one screen
/// instance. Construction leaves the state empty; the host issues
/// `load_next_page()` right after construction to fetch the first page.
/// State is rebuilt from the first page whenever the store is reconstructed.
pub struct CatalogStore<C> {
    gateway: Gateway<C>,
    extractor: Arc<dyn ColorExtractor>,
    inner: Mutex<Inner>,
    publisher: watch::Sender<CatalogState>,
}

impl<C: PokeApiClient> CatalogStore<C> {
    pub fn new(client: C) -> Self {
        Self::with_extractor(client, Arc::new(PaletteExtractor::default()))
    }

    pub fn with_extractor(client: C, extractor: Arc<dyn ColorExtractor>) -> Self {
        let state = CatalogState::default();
        let (publisher, _) = watch::channel(state.clone());
        Self {
            gateway: Gateway::new(client),
            extractor,
            inner: Mutex::new(Inner {
                state,
                last_failed: None,
                color_jobs: HashMap::new(),
            }),
            publisher,
        }
    }

    pub fn snapshot(&self) -> CatalogState {
        self.lock().state.clone()
    }

    /// Observation channel; a fresh snapshot is published after every state
    /// mutation.
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.publisher.subscribe()
    }

    /// Fetches the next page and appends its entries. No-op while a page
    /// fetch is outstanding or once the end of the catalog was reached; the
    /// guard check and the flag flip happen under one lock, so overlapping
    /// intents cannot issue concurrent fetches against the same cursor.
    pub async fn load_next_page(&self) {
        let offset = {
            let mut inner = self.lock();
            if inner.state.end_reached || inner.state.is_loading {
                return;
            }
            inner.state.is_loading = true;
            self.publish(&inner.state);
            inner.state.cursor_page * PAGE_SIZE
        };

        debug!(offset, "loading catalog page");
        let outcome = self.gateway.fetch_page(PAGE_SIZE, offset).await;

        let mut inner = self.lock();
        match outcome {
            Outcome::Success(page) => {
                // The end check uses the pre-increment cursor, matching the
                // offset the page was fetched at.
                inner.state.end_reached = inner.state.cursor_page * PAGE_SIZE >= page.count;
                for resource in &page.results {
                    match CatalogEntry::from_resource(resource) {
                        Ok(entry) => inner.state.items.push(entry),
                        Err(err) => warn!(%err, "excluding unparseable catalog entry"),
                    }
                }
                inner.state.cursor_page += 1;
                inner.state.load_error.clear();
                inner.state.is_loading = false;
                if inner.last_failed == Some(FailedOp::Page) {
                    inner.last_failed = None;
                }
                debug!(
                    items = inner.state.items.len(),
                    cursor = inner.state.cursor_page,
                    end_reached = inner.state.end_reached,
                    "catalog page loaded"
                );
            }
            Outcome::Error(message) => {
                inner.state.load_error = message;
                inner.state.is_loading = false;
                inner.last_failed = Some(FailedOp::Page);
            }
            Outcome::Loading => {}
        }
        self.publish(&inner.state);
    }

    /// Looks up a single entity by name. An empty query leaves search mode
    /// and clears the search stream; a fetch still in flight at that point
    /// completes without effect. The paginated list is untouched either way.
    /// Names are lowercased before hitting the gateway.
    pub async fn search(&self, text: &str) {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            let mut inner = self.lock();
            inner.state.search_query.clear();
            inner.state.search_result = None;
            inner.state.search_error.clear();
            if matches!(inner.last_failed, Some(FailedOp::Search(_))) {
                inner.last_failed = None;
            }
            self.publish(&inner.state);
            return;
        }

        {
            let mut inner = self.lock();
            if inner.state.search_loading {
                return;
            }
            inner.state.search_loading = true;
            inner.state.search_query = query.clone();
            self.publish(&inner.state);
        }

        debug!(name = %query, "searching catalog");
        let outcome = self.gateway.fetch_detail(&query).await;

        let mut inner = self.lock();
        inner.state.search_loading = false;
        // An empty-query clear issued while the fetch was suspended wins:
        // the late completion is dropped instead of resurrecting a result
        // for a query that no longer exists.
        if inner.state.search_query != query {
            self.publish(&inner.state);
            return;
        }
        match outcome {
            Outcome::Success(detail) => {
                inner.state.search_result = Some(detail.search_entry());
                inner.state.search_error.clear();
                if matches!(inner.last_failed, Some(FailedOp::Search(_))) {
                    inner.last_failed = None;
                }
            }
            Outcome::Error(message) => {
                inner.state.search_error = message;
                inner.last_failed = Some(FailedOp::Search(query));
            }
            Outcome::Loading => {}
        }
        self.publish(&inner.state);
    }

    /// Re-issues the last failed operation, if any. The failed page fetch is
    /// replayed against the unchanged cursor, so the request is identical.
    pub async fn retry(&self) {
        let failed = self.lock().last_failed.clone();
        match failed {
            Some(FailedOp::Page) => self.load_next_page().await,
            Some(FailedOp::Search(query)) => self.search(&query).await,
            None => {}
        }
    }

    /// Fire-and-forget dominant-color job for one list item. A new job for
    /// the same id supersedes the previous one; a superseded or paletteless
    /// job never invokes the callback. Must be called from within a tokio
    /// runtime.
    pub fn item_image_loaded<F>(&self, item_id: u32, image: RgbaImage, on_finish: F)
    where
        F: FnOnce(Rgb) + Send + 'static,
    {
        let extractor = Arc::clone(&self.extractor);
        let mut inner = self.lock();
        if let Some(previous) = inner.color_jobs.remove(&item_id) {
            previous.abort();
        }
        let handle = tokio::spawn(async move {
            let computed =
                tokio::task::spawn_blocking(move || extractor.dominant_color(&image)).await;
            if let Ok(Some(color)) = computed {
                on_finish(color);
            }
        });
        inner.color_jobs.insert(item_id, handle);
    }

    fn publish(&self, state: &CatalogState) {
        self.publisher.send_replace(state.clone());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Invariant: the guard is held within one synchronous turn, never
        // across an await.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C> Drop for CatalogStore<C> {
    fn drop(&mut self) {
        if let Ok(inner) = self.inner.get_mut() {
            for job in inner.color_jobs.values() {
                job.abort();
            }
        }
    }
}
